use composer_html::{Fragment, normalize_html, sanitize_html};

const NOTICE: &str = r#"<H2>Annual Meeting</H2>
<P>Dear {{resident.first_name}},
<P>The <B>{{association.name}}</B> board meets on {{meeting.date}}.
<UL><LI>Agenda<LI>Budget review</UL>
<p><a href="{{links.portal}}" onclick="track()">Open the portal</a></p>"#;

#[test]
fn realistic_notice_normalizes_once() {
    let once = normalize_html(NOTICE);
    assert_eq!(normalize_html(&once), once);
    insta::assert_snapshot!(once.replace('\n', "⏎"), @r#"<h2>Annual Meeting</h2>⏎<p>Dear {{resident.first_name}},⏎</p><p>The <b>{{association.name}}</b> board meets on {{meeting.date}}.⏎</p><ul><li>Agenda</li><li>Budget review</li></ul>⏎<p><a href="{{links.portal}}" onclick="track()">Open the portal</a></p>"#);
}

#[test]
fn normalization_keeps_every_merge_tag() {
    let fragment = Fragment::parse(NOTICE);
    let text = fragment.text_content();
    for tag in [
        "{{resident.first_name}}",
        "{{association.name}}",
        "{{meeting.date}}",
    ] {
        assert!(text.contains(tag), "missing {tag}");
    }
    assert!(normalize_html(NOTICE).contains("{{links.portal}}"));
}

#[test]
fn sanitized_notice_has_no_handlers() {
    let clean = sanitize_html(NOTICE);
    assert!(!clean.contains("onclick"));
    assert!(clean.contains("href=\"{{links.portal}}\""));
}
