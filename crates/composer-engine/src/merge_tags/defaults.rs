//! Built-in merge tags, used when no templating service or catalog file is
//! configured.

use super::catalog::MergeTagCatalog;
use super::model::{MergeTag, MergeTagGroup};

/// `(path, name, description, example)` per category.
type TagSpec = (&'static str, &'static str, &'static str, &'static str);

const RESIDENT: &[TagSpec] = &[
    ("resident.name", "Resident Name", "Full name of the resident", "Ann Lee"),
    ("resident.first_name", "First Name", "Resident's first name", "Ann"),
    ("resident.last_name", "Last Name", "Resident's last name", "Lee"),
    ("resident.email", "Email", "Primary email address", "ann.lee@example.com"),
    ("resident.unit", "Unit Number", "Unit the resident lives in", "4B"),
    ("resident.address", "Mailing Address", "Resident's mailing address", "12 Maple Court, Springfield"),
];

const ASSOCIATION: &[TagSpec] = &[
    ("association.name", "Association Name", "Legal name of the association", "Maple Court HOA"),
    ("association.phone", "Office Phone", "Management office phone number", "555-0100"),
    ("association.email", "Office Email", "Management office email address", "office@maplecourt.example"),
    ("association.portal_url", "Portal Link", "Resident portal address", "https://portal.maplecourt.example"),
];

const FINANCIAL: &[TagSpec] = &[
    ("financial.balance", "Current Balance", "Outstanding account balance", "$240.00"),
    ("financial.due_date", "Due Date", "Date the next payment is due", "April 1, 2026"),
    ("financial.monthly_dues", "Monthly Dues", "Regular monthly assessment", "$180.00"),
    ("financial.last_payment", "Last Payment", "Amount of the most recent payment", "$180.00"),
];

const DATE: &[TagSpec] = &[
    ("date.today", "Today's Date", "Date the message is sent", "March 1, 2026"),
    ("date.month", "Current Month", "Month the message is sent", "March"),
    ("date.year", "Current Year", "Year the message is sent", "2026"),
];

fn group(category: &str, name: &str, specs: &[TagSpec]) -> MergeTagGroup {
    let tags = specs
        .iter()
        .map(|(path, tag_name, description, example)| {
            MergeTag::new(path.replace('.', "-"), format!("{{{{{path}}}}}"), *tag_name, category)
                .with_description(*description)
                .with_example(*example)
        })
        .collect();
    MergeTagGroup::new(category, name, tags)
}

pub fn default_groups() -> Vec<MergeTagGroup> {
    vec![
        group("resident", "Resident", RESIDENT),
        group("association", "Association", ASSOCIATION),
        group("financial", "Financial", FINANCIAL),
        group("date", "Date", DATE),
    ]
}

pub fn default_catalog() -> MergeTagCatalog {
    MergeTagCatalog::from_groups(default_groups())
}
