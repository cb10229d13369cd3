use attrlift::{
    move_text_to_attribute, parse, probe, ContextAction, Dialect, Document, EditHost, Error,
    MoveTextToAttribute, NodePath, Outcome, SelectionProvider, Session, TextPatch,
    SUPPORTED_TAGS,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn run_at(src: &str, needle: &str) -> Result<Option<String>, Error> {
    let offset = src.find(needle).unwrap_or_default();
    move_text_to_attribute(src, offset, Dialect::Xml)
}

#[test]
fn test_label_scenario() -> TestResult {
    let out = run_at("<Label>Hello</Label>", "Hello")?;
    assert_eq!(out.as_deref(), Some("<Label Content=\"Hello\"/>"));
    Ok(())
}

#[test]
fn test_text_block_trims_whitespace() -> TestResult {
    let out = run_at("<TextBlock>  Some Text  </TextBlock>", "Some")?;
    assert_eq!(out.as_deref(), Some("<TextBlock Text=\"Some Text\"/>"));
    Ok(())
}

#[test]
fn test_unsupported_tag_is_left_alone() -> TestResult {
    let src = "<Grid>Hello</Grid>";
    assert_eq!(probe(src, 7)?, None);
    assert_eq!(run_at(src, "Hello")?, None);
    Ok(())
}

#[test]
fn test_button_quotes_are_escaped() -> TestResult {
    let out = run_at("<Button>Say \"Hi\"</Button>", "Say")?;
    assert_eq!(out.as_deref(), Some("<Button Content=\"Say &quot;Hi&quot;\"/>"));
    Ok(())
}

#[test]
fn test_empty_check_box_is_not_applicable() -> TestResult {
    let src = "<CheckBox></CheckBox>";
    for offset in 0..src.len() {
        assert_eq!(probe(src, offset)?, None, "offset {offset}");
    }
    Ok(())
}

#[test]
fn test_every_supported_tag() -> TestResult {
    for (tag, attribute) in SUPPORTED_TAGS.iter() {
        let src = format!("<{tag}>TEXT</{tag}>");
        let out = run_at(&src, "TEXT")?;
        assert_eq!(out, Some(format!("<{tag} {attribute}=\"TEXT\"/>")));
    }
    Ok(())
}

#[test]
fn test_caret_at_either_end_of_text() -> TestResult {
    let src = "<Label>Hello</Label>";
    assert!(probe(src, 7)?.is_some());
    assert!(probe(src, 12)?.is_some());
    assert!(probe(src, 3)?.is_none());
    assert!(probe(src, 14)?.is_none());
    Ok(())
}

#[test]
fn test_unrelated_regions_are_byte_identical() -> TestResult {
    let src = concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<Window   xmlns:x='urn:x'  Title=\"a &amp; b\" >\n",
        "    <!-- header -->\n",
        "    <Label>Name</Label>\n",
        "    <TextBox   Width = \"120\" >  typed value </TextBox>\n",
        "</Window>\n",
    );
    let out = run_at(src, "typed")?;
    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<Window   xmlns:x='urn:x'  Title=\"a &amp; b\" >\n",
        "    <!-- header -->\n",
        "    <Label>Name</Label>\n",
        "    <TextBox Text=\"typed value\" Width=\"120\"/>\n",
        "</Window>\n",
    );
    assert_eq!(out.as_deref(), Some(expected));
    Ok(())
}

#[test]
fn test_line_breaks_become_character_references() -> TestResult {
    let out = run_at("<TextBlock>\n  line one\n  line\ttwo\n</TextBlock>", "line")?;
    assert_eq!(
        out.as_deref(),
        Some("<TextBlock Text=\"line one&#10;  line&#9;two\"/>")
    );
    let doc = parse(out.as_deref().unwrap_or_default())?;
    assert_eq!(doc.root.attribute("Text"), Some("line one\n  line\ttwo"));
    Ok(())
}

#[test]
fn test_comment_siblings_are_removed() -> TestResult {
    let out = run_at("<RadioButton>On<!-- default --></RadioButton>", "On")?;
    assert_eq!(out.as_deref(), Some("<RadioButton Content=\"On\"/>"));
    Ok(())
}

#[test]
fn test_second_invocation_is_a_no_op() -> TestResult {
    let mut session = Session::new("<RepeatButton>More</RepeatButton>")?;
    session.set_caret(15)?;
    let action = MoveTextToAttribute::new();

    let first = action.execute(&mut session)?;
    assert!(first.is_applied());
    let once = session.source().to_string();

    session.set_caret(15)?;
    assert_eq!(action.execute(&mut session)?, Outcome::NotApplicable);
    assert_eq!(session.source(), once);
    Ok(())
}

#[test]
fn test_html_dialect_keeps_explicit_close() -> TestResult {
    let src = "<form><button>Send</button><Label>Hello</Label></form>";
    let offset = src.find("Hello").unwrap_or_default();
    let out = move_text_to_attribute(src, offset, Dialect::Html)?;
    assert_eq!(
        out.as_deref(),
        Some("<form><button>Send</button><Label Content=\"Hello\"></Label></form>")
    );
    Ok(())
}

#[test]
fn test_action_metadata() {
    let action = MoveTextToAttribute::default();
    assert_eq!(action.name(), "Move text to attribute");
    assert_eq!(action.description(), "Moves the text content to an attribute");
    assert_eq!(action.group(), "XAML");
}

/// Host whose commit always fails, to check nothing leaks through
struct RefusingHost {
    source: String,
    document: Document,
    caret: usize,
    dirty: bool,
}

impl SelectionProvider for RefusingHost {
    fn current_node(&self, want_leaf: bool) -> Option<NodePath> {
        self.document.node_at(self.caret, want_leaf)
    }
}

impl EditHost for RefusingHost {
    fn document(&self) -> &Document {
        &self.document
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn dialect(&self) -> Dialect {
        Dialect::Xml
    }

    fn commit(&mut self, _patch: TextPatch) -> attrlift::Result<()> {
        Err(Error::malformed("buffer is read-only"))
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[test]
fn test_failed_commit_leaves_host_untouched() -> TestResult {
    let source = "<Label>Hello</Label>".to_string();
    let mut host = RefusingHost {
        document: parse(&source)?,
        source,
        caret: 8,
        dirty: false,
    };
    let action = MoveTextToAttribute::new();
    assert!(action.is_available(&host));

    let before = host.document.clone();
    let err = action.execute(&mut host).err();
    assert_eq!(err.map(|e| e.is_malformed_tree()), Some(true));
    assert_eq!(host.document, before);
    assert_eq!(host.source, "<Label>Hello</Label>");
    assert!(!host.dirty);
    Ok(())
}

#[test]
fn test_existing_attribute_is_repeated() -> TestResult {
    let src = "<Label Content=\"old\">new</Label>";
    let mut session = Session::new(src)?;
    session.set_caret(src.find("new").unwrap_or_default())?;

    let outcome = MoveTextToAttribute::new().execute(&mut session)?;
    assert!(outcome.is_applied());
    assert_eq!(session.source(), "<Label Content=\"new\" Content=\"old\"/>");
    assert!(session.is_dirty());

    let out = run_at(src, "new")?;
    assert_eq!(out.as_deref(), Some("<Label Content=\"new\" Content=\"old\"/>"));
    Ok(())
}

#[test]
fn test_parse_error_reports_position() {
    let err = probe("<Label>\n  Hi</Labl>", 9).err();
    let pos = err.map(|e| e.span().start);
    assert_eq!(pos.map(|p| (p.line, p.col)), Some((2, 5)));
}
