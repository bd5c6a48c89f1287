// SPDX-License-Identifier: Apache-2.0

use bijux_labeler_model::{ImageName, LabelName, ProjectName};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn ordinary_names_validate_and_display_verbatim(raw in "[A-Za-z0-9_][A-Za-z0-9 _.-]{0,40}") {
        prop_assume!(raw != "." && raw != "..");
        let project = ProjectName::new(raw.clone()).expect("valid project");
        prop_assert_eq!(project.to_string(), raw.clone());
        let label: LabelName = raw.parse().expect("valid label");
        prop_assert_eq!(label.as_str(), raw.as_str());
    }

    #[test]
    fn names_with_separators_never_validate(
        head in "[a-z]{0,8}",
        sep in prop::sample::select(vec!['/', '\\', '\0']),
        tail in "[a-z]{0,8}"
    ) {
        let raw = format!("{head}{sep}{tail}");
        prop_assert!(ImageName::new(raw).is_err());
    }

    #[test]
    fn whitespace_only_names_never_validate(raw in "[ \t\n]{1,12}") {
        prop_assert!(ProjectName::new(raw).is_err());
    }
}
