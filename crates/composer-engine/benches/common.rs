// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_message(paragraphs: usize) -> String {
    let base = "<h2>Notice</h2><p>Dear {{resident.first_name}},</p>\
<p>Your balance of <b>{{financial.balance}}</b> is due on {{financial.due_date}}.</p>\
<ul><li>Pool opens in {{date.month}}</li><li>Call {{association.phone}}</li></ul>";
    base.repeat(paragraphs)
}

#[allow(dead_code)]
pub fn generate_tag_heavy(tags: usize) -> String {
    let mut content = String::new();
    for i in 0..tags {
        match i % 3 {
            0 => content.push_str("{{resident.name}} "),
            1 => content.push_str("{{ association.name }} "),
            _ => content.push_str(&format!("{{{{unknown.field_{i}}}}} ")),
        }
    }
    content
}
