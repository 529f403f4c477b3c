use regex_analysis::{Error, Flags, LenBound, Node, NodeId, PatternBuilder};

#[test]
fn test_source_and_spans() {
    let mut b = PatternBuilder::new();
    let a = b.seq("a");
    let group = b.capturing_group([a]);
    let dot = b.char('.');
    let left = b.alternative([group, dot]);
    let digit = b.digit(false);
    let star = b.star(digit);
    let right = b.alternative([star]);
    let pattern = b.finish([left, right]).unwrap();

    assert_eq!(pattern.source(), r"(a)\.|\d*");
    assert_eq!(pattern.span(group), 0..3);
    assert_eq!(pattern.raw(dot), r"\.");
    assert_eq!(pattern.raw(left), r"(a)\.");
    assert_eq!(pattern.raw(star), r"\d*");
    assert_eq!(pattern.span(pattern.root()), 0..pattern.source().len());
}

#[test]
fn test_parents() {
    let mut b = PatternBuilder::new();
    let x = b.char('x');
    let class = b.class(true, [x]);
    let q = b.quantifier(class, 2, LenBound::Infinite, false).unwrap();
    let alt = b.alternative([q]);
    let pattern = b.finish([alt]).unwrap();

    assert_eq!(pattern.source(), "[^x]{2,}?");
    assert_eq!(pattern.parent(x), Some(class));
    assert_eq!(pattern.parent(class), Some(q));
    assert_eq!(pattern.parent(alt), Some(pattern.root()));
    assert_eq!(pattern.parent(pattern.root()), None);
    assert_eq!(pattern.ancestors(x).collect::<Vec<_>>(), vec![class, q, alt, pattern.root()]);
    assert!(pattern.is_ancestor_of(q, x));
    assert!(!pattern.is_ancestor_of(x, x));
}

#[test]
fn test_capture_indices() {
    let mut b = PatternBuilder::new();
    let a = b.seq("a");
    let first_inner = b.capturing_group([a]);
    let bee = b.seq("b");
    let second_inner = b.named_group("n", [bee]);
    let inner = b.alternative([first_inner, second_inner]);
    let outer = b.capturing_group([inner]);
    let reference = b.backreference(3);
    let alt = b.alternative([outer, reference]);
    let pattern = b.finish([alt]).unwrap();

    assert_eq!(pattern.source(), r"((a)(?<n>b))\k<n>");
    assert_eq!(pattern.capture_count(), 3);
    assert_eq!(pattern.capturing_group(1), Some(outer));
    assert_eq!(pattern.capturing_group(2), Some(first_inner));
    assert_eq!(pattern.capturing_group(3), Some(second_inner));
    assert_eq!(pattern.capturing_group(0), None);
    assert_eq!(pattern.capturing_group_by_name("n"), Some(second_inner));
    assert_eq!(pattern.resolved_group(reference), second_inner);
    assert!(matches!(
        pattern.node(first_inner),
        Node::CapturingGroup { index: 2, name: None, .. }
    ));
}

#[test]
fn test_unresolved_references() {
    let mut b = PatternBuilder::new();
    let a = b.seq("a");
    let group = b.capturing_group([a]);
    let reference = b.backreference(2);
    let alt = b.alternative([group, reference]);
    assert_eq!(b.finish([alt]).unwrap_err(), Error::UnresolvedBackreference(2));

    let mut b = PatternBuilder::new();
    let reference = b.named_backreference("missing");
    let alt = b.alternative([reference]);
    assert_eq!(
        b.finish([alt]).unwrap_err(),
        Error::UnknownGroupName("missing".to_owned())
    );
}

#[test]
fn test_malformed_trees() {
    let mut b = PatternBuilder::new();
    let a = b.char('a');
    let left = b.alternative([a]);
    let right = b.alternative([a]);
    assert_eq!(
        b.finish([left, right]).unwrap_err(),
        Error::NodeReused { index: a.index() }
    );

    let mut b = PatternBuilder::new();
    let a = b.char('a');
    let stray = b.char('b');
    let alt = b.alternative([a]);
    assert_eq!(
        b.finish([alt]).unwrap_err(),
        Error::DetachedNode {
            index: stray.index()
        }
    );

    let mut b = PatternBuilder::new();
    let group = b.group(Vec::<NodeId>::new());
    let alt = b.alternative([group]);
    assert_eq!(
        b.finish([alt]).unwrap_err(),
        Error::MissingAlternatives { kind: "group" }
    );

    let mut b = PatternBuilder::new();
    let a = b.char('a');
    let group = b.group([a]);
    let alt = b.alternative([group]);
    assert_eq!(
        b.finish([alt]).unwrap_err(),
        Error::UnexpectedNode {
            kind: "character",
            parent: "group"
        }
    );

    let mut b = PatternBuilder::new();
    let end = b.end();
    let q = b.star(end);
    let alt = b.alternative([q]);
    assert_eq!(
        b.finish([alt]).unwrap_err(),
        Error::UnexpectedNode {
            kind: "assertion",
            parent: "quantifier"
        }
    );
}

#[test]
fn test_invalid_range() {
    let mut b = PatternBuilder::new();
    assert!(matches!(b.range('z', 'a'), Err(Error::CharSet(_))));
}

#[test]
fn test_flags() {
    let flags: Flags = "yusmig".parse().unwrap();
    assert!(flags.global && flags.ignore_case && flags.multiline);
    assert!(flags.dot_all && flags.unicode && flags.sticky);
    assert_eq!(flags.to_string(), "gimsuy");
    assert_eq!(Flags::parse("").unwrap(), Flags::default());
    assert_eq!(Flags::parse("u").unwrap().maximum(), 0x10_FFFF);
    assert_eq!(Flags::default().maximum(), 0xFFFF);

    assert_eq!(
        Flags::parse("gx"),
        Err(Error::UnknownFlag { pos: 1, flag: 'x' })
    );
    assert_eq!(
        Flags::parse("imi"),
        Err(Error::DuplicateFlag { pos: 2, flag: 'i' })
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::InvalidQuantifier {
            min: 3,
            max: LenBound::Finite(2)
        }
        .to_string(),
        "numbers out of order in quantifier ({3,2})"
    );
    assert_eq!(
        Error::UnresolvedBackreference(4).to_string(),
        r"backreference \4 has no capturing group"
    );
}
