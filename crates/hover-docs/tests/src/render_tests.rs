use expect_test::expect;

use super::*;
use crate::syntax::{BuiltinSyntax, SyntaxEngine, SyntaxId};
use crate::text::TagRun;

struct FixedStyles;

impl StyleLookup for FixedStyles {
    fn style_for(
        &self,
        tag: &str,
    ) -> Style {
        match tag {
            "a" => Style::foreground("red"),
            "b" => Style::foreground("blue"),
            "c" => Style {
                bold: true,
                underline: true,
                background: Some("black".to_string()),
                ..Style::foreground("green")
            },
            "d" => Style {
                italic: true,
                ..Style::foreground("white")
            },
            _ => self.default_style(),
        }
    }

    fn default_style(&self) -> Style {
        Style::foreground("white")
    }
}

fn tags(names: &[&str]) -> Tags {
    names.iter().copied().collect()
}

#[test]
fn escapes_and_preserves_spacing() {
    assert_eq!(markup_text("a<b> & 'c'"), "a&lt;b&gt; &amp; &#x27;c&#x27;");
    assert_eq!(markup_text("x    y"), "x &nbsp;&nbsp;&nbsp;y");
    assert_eq!(markup_text("one\ntwo"), "one<br>two");
    assert_eq!(markup_text("one\r\ntwo"), "one<br>two");
    assert_eq!(markup_text("a b"), "a b");
}

#[test]
fn later_non_default_tag_wins() {
    let default = FixedStyles.default_style();
    assert_eq!(style_for_tags(&tags(&["a", "b"]), &FixedStyles, &default).foreground, "blue");
    assert_eq!(style_for_tags(&tags(&["a", "zzz"]), &FixedStyles, &default).foreground, "red");
    assert_eq!(style_for_tags(&tags(&["zzz", "a"]), &FixedStyles, &default).foreground, "red");
    assert_eq!(style_for_tags(&tags(&[]), &FixedStyles, &default).foreground, "white");
}

#[test]
fn all_default_tags_fall_back_to_first() {
    let default = FixedStyles.default_style();
    let style = style_for_tags(&tags(&["d", "zzz"]), &FixedStyles, &default);
    assert!(style.italic);
    assert!(!style_for_tags(&tags(&["zzz", "d"]), &FixedStyles, &default).italic);
    assert_eq!(style_for_tags(&tags(&["d", "a"]), &FixedStyles, &default).foreground, "red");
}

#[test]
fn renders_style_attributes() {
    let buffer = TaggedText::with_runs("xy", vec![TagRun::new(0, 1, tags(&["c"])), TagRun::new(1, 2, tags(&["q"]))]);
    let html = render_all(&buffer, &FixedStyles);
    expect![[r#"<div style='display:inline; color:green; background-color:black; font-weight:bold; text-decoration:underline;'>x</div><div style='display:inline; color:white;'>y</div>"#]]
        .assert_eq(&html);
}

#[test]
fn untagged_text_uses_default_style() {
    let html = render_all(&TaggedText::untagged("a  <b>\n"), &BasicTheme::new());
    expect![[r#"<div style='display:inline; color:#f8f8f2;'>a &nbsp;&lt;b&gt;<br></div>"#]].assert_eq(&html);
}

#[test]
fn renders_definition_with_theme() {
    let syntax = SyntaxId::new("python");
    let text = "def f(x):\n";
    let buffer = TaggedText::with_runs(text, BuiltinSyntax::new().tokenize(&syntax, text));
    let html = render(&buffer, Span::new(4, 8), &BasicTheme::new());
    expect![[r#"<div style='display:inline; color:#a6e22e;'>f</div><div style='display:inline; color:#f8f8f2;'>(</div><div style='display:inline; color:#fd971f; font-style:italic;'>x</div><div style='display:inline; color:#f8f8f2;'>)</div>"#]]
        .assert_eq(&html);
}

#[test]
fn identical_neighbouring_runs_render_as_one() {
    let buffer = TaggedText::with_runs("abcd", vec![
        TagRun::new(0, 2, tags(&["a"])),
        TagRun::new(2, 4, tags(&["a"])),
    ]);
    assert_eq!(render_all(&buffer, &FixedStyles).matches("<div").count(), 1);
}

#[test]
fn theme_prefers_longest_prefix() {
    let theme = BasicTheme::new().with_rule("comment.block.documentation", Style::foreground("#ffffff"));
    assert_eq!(theme.style_for("comment.block.documentation.rust").foreground, "#ffffff");
    assert_eq!(theme.style_for("comment.line.rust").foreground, "#75715e");
    assert_eq!(theme.style_for("source.rust"), theme.default_style());
}
