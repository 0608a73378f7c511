//! Label algebra properties over representative specifiers and labels.

use bootenv::constants::NAME_MAX;
use bootenv::label::{extract_label, relabel};
use bootenv::types::LabelError;

#[test]
fn relabel_then_extract_yields_the_label() {
    let specs = [
        "/dev/serno/S1.s1d@ROOT",
        "/dev/da0s1d@VAR",
        "vbd0s1a@LOCAL",
    ];
    let longest = "x".repeat(NAME_MAX - 1);
    let labels = ["alpha", "2026-10-16", "pre_upgrade.1", longest.as_str()];
    for spec in specs {
        for label in labels {
            let r = relabel(spec, label).unwrap();
            assert_eq!(extract_label(&r.spec), Some(label), "{spec} + {label}");
            assert!(r.spec.starts_with(spec));
        }
    }
}

#[test]
fn overflow_is_rejected_without_touching_the_spec() {
    let spec = format!("/dev/da0s1d@ROOT:{}", "c".repeat(100));
    let label = "l".repeat(NAME_MAX - 1 - 100);
    // 1 + 100 + 154 = 255
    match relabel(&spec, &label) {
        Err(LabelError::TooLong { needed, max, .. }) => {
            assert_eq!(needed, NAME_MAX);
            assert_eq!(max, NAME_MAX - 1);
        }
        other => panic!("expected TooLong, got {other:?}"),
    }
    assert!(relabel(&spec, &label[1..]).is_ok());
}
