//! Lexer, parser, and AST for the **Nabu UI markup language** (`.uiml`).
//!
//! The grammar is a strict XML subset: one root element, quoted attributes,
//! self-closing tags, comments and an optional prolog. Character data is
//! accepted and ignored. Attribute values stay raw strings here; typed
//! coercion belongs to the runtime.
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! editors and linters without pulling in the runtime or any host code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `MarkupDocument`, `MarkupNode`, `Attr`, `ElementKind` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token`, `TokenWithPos` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use nabu_markup::{parse_str, ElementKind};
//!
//! let src = r#"
//!     <UIML>
//!         <Panel name="root" size="400,300">
//!             <Text name="title" text="Hello" fontSize="18" />
//!         </Panel>
//!     </UIML>
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.tag, "UIML");
//! assert_eq!(doc.root.children[0].kind(), Some(ElementKind::Panel));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Attr, ElementKind, MarkupDocument, MarkupNode};
pub use error::ParseError;
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> MarkupDocument { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    #[test] fn empty_root() { ok("<UIML/>"); }
    #[test] fn root_with_open_close() { ok("<UIML></UIML>"); }
    #[test] fn with_prolog() {
        ok("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<UIML><Panel name=\"a\"/></UIML>");
    }
    #[test] fn comments_anywhere() {
        ok("<!-- head --><UIML><!-- body --><Panel name=\"a\"/><!-- tail --></UIML><!-- end -->");
    }
    #[test] fn text_content_ignored() {
        let doc = ok("<UIML>hello<Panel name=\"a\"/>world</UIML>");
        assert_eq!(doc.root.children.len(), 1);
    }
    #[test] fn attrs_in_order() {
        let doc = ok(r#"<UIML><Button name="b" text="Go" size='160,40'/></UIML>"#);
        let b = &doc.root.children[0];
        let keys: Vec<_> = b.attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["name", "text", "size"]);
        assert_eq!(b.attr("size"), Some("160,40"));
        assert_eq!(b.attr("Size"), None);
    }
    #[test] fn nested_children_in_order() {
        let doc = ok(r#"<UIML>
            <Panel name="outer">
                <Text name="one"/>
                <Text name="two"/>
                <Panel name="inner"><Image name="three"/></Panel>
            </Panel>
        </UIML>"#);
        let outer = &doc.root.children[0];
        let names: Vec<_> = outer.children.iter().filter_map(|c| c.attr("name")).collect();
        assert_eq!(names, ["one", "two", "inner"]);
        assert_eq!(outer.children[2].children[0].attr("name"), Some("three"));
        assert_eq!(doc.root.subtree_len(), 6);
    }
    #[test] fn node_positions() {
        let doc = ok("<UIML>\n    <Panel name=\"a\"/>\n</UIML>");
        let p = &doc.root.children[0];
        assert_eq!((p.line, p.col), (2, 5));
    }
    #[test] fn entity_in_value() {
        let doc = ok(r#"<UIML><Text name="t" text="Fish &amp; Chips"/></UIML>"#);
        assert_eq!(doc.root.children[0].attr("text"), Some("Fish & Chips"));
    }
    #[test] fn kinds_are_case_insensitive() {
        let doc = ok(r#"<UIML><scrollview name="s"/><PROGRESSBAR name="p"/><Canvas name="c"/><Widget name="w"/></UIML>"#);
        let kinds: Vec<_> = doc.root.children.iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, [
            Some(ElementKind::ScrollArea),
            Some(ElementKind::ProgressBar),
            Some(ElementKind::Surface),
            None,
        ]);
    }

    // ── Errors ───────────────────────────────────────────────────────────

    #[test] fn empty_document() {
        assert!(err("   <!-- nothing -->  ").message.contains("no root"));
    }
    #[test] fn duplicate_attribute() {
        let e = err(r#"<UIML><Panel name="a" name="b"/></UIML>"#);
        assert!(e.message.contains("duplicate attribute 'name'"));
    }
    #[test] fn mismatched_close() {
        let e = err("<UIML>\n<Panel name=\"a\">\n</Text>\n</UIML>");
        assert!(e.message.contains("mismatched"));
        assert_eq!((e.line, e.col), (3, 1));
    }
    #[test] fn unclosed_element_points_at_open_tag() {
        let e = err("<UIML>\n  <Panel name=\"a\">");
        assert!(e.message.contains("unclosed element <Panel>"));
        assert_eq!((e.line, e.col), (2, 3));
    }
    #[test] fn two_roots() { err("<UIML/><UIML/>"); }
    #[test] fn text_before_root() { err("junk <UIML/>"); }
    #[test] fn unquoted_value() { err("<UIML><Panel name=a/></UIML>"); }
    #[test] fn missing_equals() { err(r#"<UIML><Panel name "a"/></UIML>"#); }
    #[test] fn lt_in_value() { err(r#"<UIML><Panel name="a<b"/></UIML>"#); }
    #[test] fn unterminated_start_tag() { err("<UIML><Panel name=\"a\""); }
}
