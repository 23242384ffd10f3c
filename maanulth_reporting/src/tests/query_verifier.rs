// @file: maanulth_reporting/src/tests/query_verifier.rs
// @description: Checks that every BCGW query renders completely for a reporting year.
// @author: LAS.

#[cfg(test)]
mod query_tests {
    use crate::core::models::{Dataset, ReportingPeriod};
    use crate::core::queries;

    fn units() -> Vec<String> {
        vec!["Sarita".to_string(), "Nahmint".to_string()]
    }

    #[test]
    fn test_every_dataset_renders_without_placeholders() {
        let period = ReportingPeriod::new(2024).unwrap();

        for dataset in Dataset::ALL {
            let sql = queries::render(dataset, &period, &units());

            // #1. No template markers survive
            assert!(!sql.contains('{'), "{} left a placeholder: {}", dataset, sql);

            // #2. Window bounds come from the period
            assert!(sql.contains("TO_DATE('01/09/2023', 'DD/MM/YYYY')"), "{}", dataset);
            assert!(sql.contains("TO_DATE('31/08/2024', 'DD/MM/YYYY')"), "{}", dataset);
        }
    }

    #[test]
    fn test_unit_joined_datasets_carry_the_unit_list() {
        let period = ReportingPeriod::new(2024).unwrap();
        for dataset in Dataset::ALL.into_iter().filter(Dataset::joins_landscape_units) {
            let sql = queries::render(dataset, &period, &units());
            assert!(sql.contains("IN ('Sarita','Nahmint')"), "{}", dataset);
        }
    }

    #[test]
    fn test_quote_list_escapes_and_handles_empty() {
        let items = vec!["Nootka's".to_string(), "Sarita".to_string()];
        assert_eq!(queries::quote_list(&items), "'Nootka''s','Sarita'");
        assert_eq!(queries::quote_list(&[]), "NULL");
    }

    #[test]
    fn test_road_unit_query_lists_map_labels() {
        let sql = queries::render_road_landscape_units(&["R9 01".to_string(), "R9 02".to_string()]);
        assert!(sql.contains("ftr.MAP_LABEL IN ('R9 01','R9 02')"));
        assert!(!sql.contains("{tm}"));
    }

    #[test]
    fn test_landscape_unit_query_targets_maanulth_area() {
        assert!(queries::LANDSCAPE_UNITS_SQL.contains("Maa-nulth First Nations"));
        assert!(queries::LANDSCAPE_UNITS_SQL.contains(queries::LANDSCAPE_UNIT_COLUMN));
    }
}
