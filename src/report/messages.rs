use std::collections::BTreeMap;

use crate::files::{OptionalFileKind, OptionalFiles};

/// Optional files mentioned in reports, with the label used in messages.
const REPORTED_FILES: [(OptionalFileKind, &str); 4] = [
    (OptionalFileKind::Calibration, "calibration"),
    (OptionalFileKind::CrossTalk, "cross-talk"),
    (OptionalFileKind::HeadPos, "headshape"),
    (OptionalFileKind::Destination, "destination"),
];

/// One `report_<field>` message per reported optional file, stating whether
/// it was provided.
pub fn optional_files_messages(files: &OptionalFiles) -> BTreeMap<String, String> {
    REPORTED_FILES
        .iter()
        .map(|(kind, label)| {
            let message = match files.get(*kind) {
                Some(_) => format!("{} file provided", title_case(label)),
                None => format!("No {} file provided", label),
            };
            (format!("report_{}", kind.field_name()), message)
        })
        .collect()
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
