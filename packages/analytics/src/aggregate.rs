//! Single-pass group-by over incarceration records.

use std::collections::{BTreeSet, HashMap};

use prison_viz_records_models::{Aggregate, GroupColumn, Record};

struct Accumulator {
    key: String,
    amount: u64,
    age_sum: f64,
    time_served_sum: f64,
}

/// Groups `records` by `column` and computes count and means per group.
///
/// Groups are returned in the order their key is first seen. A `NaN`
/// age or time served poisons that group's mean, so malformed input
/// shows up as `NaN` instead of an error. Records without a value for
/// `column` are grouped under
/// [`UNDEFINED_KEY`](prison_viz_records_models::UNDEFINED_KEY).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(records: &[Record], column: &GroupColumn) -> Vec<Aggregate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Accumulator> = Vec::new();

    for record in records {
        let key = record.group_key(column);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Accumulator {
                    key,
                    amount: 0,
                    age_sum: 0.0,
                    time_served_sum: 0.0,
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.amount += 1;
        group.age_sum += record.age;
        group.time_served_sum += record.time_served;
    }

    log::debug!(
        "Aggregated {} records by {column} into {} groups",
        records.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|g| Aggregate {
            age_avg: g.age_sum / g.amount as f64,
            time_served_avg: g.time_served_sum / g.amount as f64,
            key: g.key,
            amount: g.amount,
        })
        .collect()
}

/// Lists the columns `records` can be grouped by: the typed columns
/// first, then every extra column seen in any record, sorted by name.
#[must_use]
pub fn columns(records: &[Record]) -> Vec<GroupColumn> {
    let known = GroupColumn::known();
    let extra: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.extra.keys().map(String::as_str))
        .collect();

    known
        .iter()
        .cloned()
        .chain(
            extra
                .into_iter()
                .map(|name| GroupColumn::from(name.to_string()))
                .filter(|c: &GroupColumn| !known.contains(c)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prison_viz_records_models::UNDEFINED_KEY;

    fn records(json: &str) -> Vec<Record> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn groups_example_by_sex() {
        let input = records(r#"[{"sex":"M","age":20},{"sex":"M","age":30},{"sex":"F","age":25}]"#);
        let groups = aggregate(&input, &GroupColumn::Sex);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "M");
        assert_eq!(groups[0].amount, 2);
        assert!((groups[0].age_avg - 25.0).abs() < f64::EPSILON);
        assert_eq!(groups[1].key, "F");
        assert_eq!(groups[1].amount, 1);
        assert!((groups[1].age_avg - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_sum_to_record_total() {
        let input = records(
            r#"[
                {"sex":"M","ethnicity":"A","age":20,"timeServed":1},
                {"sex":"F","ethnicity":"B","age":22,"timeServed":2},
                {"sex":"M","ethnicity":"C","age":40,"timeServed":3},
                {"sex":"F","ethnicity":"A","age":35,"timeServed":4},
                {"ethnicity":"B","age":50,"timeServed":5}
            ]"#,
        );
        for column in GroupColumn::known() {
            let total: u64 = aggregate(&input, &column).iter().map(|g| g.amount).sum();
            assert_eq!(total, input.len() as u64, "column {column}");
        }
    }

    #[test]
    fn group_mean_matches_arithmetic_mean() {
        let input = records(
            r#"[
                {"ethnicity":"A","age":21,"timeServed":2},
                {"ethnicity":"A","age":34,"timeServed":6},
                {"ethnicity":"A","age":50,"timeServed":10},
                {"ethnicity":"B","age":19,"timeServed":1}
            ]"#,
        );
        let groups = aggregate(&input, &GroupColumn::Ethnicity);
        let a = groups.iter().find(|g| g.key == "A").unwrap();
        assert!((a.age_avg - 35.0).abs() < 1e-9);
        assert!((a.time_served_avg - 6.0).abs() < 1e-9);
    }

    #[test]
    fn single_distinct_value_yields_one_group() {
        let input = records(r#"[{"sex":"F","age":20},{"sex":"F","age":40},{"sex":"F","age":60}]"#);
        let groups = aggregate(&input, &GroupColumn::Sex);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].amount, 3);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate(&[], &GroupColumn::Sex).is_empty());
    }

    #[test]
    fn malformed_age_propagates_nan() {
        let input = records(r#"[{"sex":"M","age":"??"},{"sex":"M","age":30},{"sex":"F","age":25}]"#);
        let groups = aggregate(&input, &GroupColumn::Sex);
        assert!(groups[0].age_avg.is_nan());
        assert!((groups[1].age_avg - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_key_goes_to_undefined_group() {
        let input = records(r#"[{"sex":"M","age":20},{"age":30}]"#);
        let groups = aggregate(&input, &GroupColumn::Sex);
        assert_eq!(groups[1].key, UNDEFINED_KEY);
    }

    #[test]
    fn groups_by_extra_column() {
        let input = records(r#"[{"county":"Cook","age":20},{"county":"Lake","age":30},{"county":"Cook","age":40}]"#);
        let groups = aggregate(&input, &GroupColumn::Other("county".to_string()));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Cook");
        assert_eq!(groups[0].amount, 2);
    }

    #[test]
    fn extra_column_named_like_typed_column_is_groupable() {
        let input = records(r#"[{"sex":"","age":20},{"age":30},{"Sex":"M","age":1,"AGE":5}]"#);
        let listed = columns(&input);
        assert!(listed.contains(&GroupColumn::Other("AGE".to_string())));

        let by_extra = aggregate(&input, &GroupColumn::from("AGE".to_string()));
        let keys: Vec<&str> = by_extra.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec![UNDEFINED_KEY, "5"]);
        assert_eq!(by_extra[0].amount, 2);
    }

    #[test]
    fn empty_label_is_its_own_group() {
        let input = records(r#"[{"sex":"","age":20},{"age":30},{"sex":"","age":40}]"#);
        let groups = aggregate(&input, &GroupColumn::Sex);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "");
        assert_eq!(groups[0].amount, 2);
        assert_eq!(groups[1].key, UNDEFINED_KEY);
    }

    #[test]
    fn lists_known_then_extra_columns() {
        let input = records(r#"[{"sex":"M","offense":"x"},{"county":"Cook"}]"#);
        let names: Vec<String> = columns(&input).iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec!["sex", "age", "ethnicity", "timeServed", "county", "offense"]
        );
    }
}
