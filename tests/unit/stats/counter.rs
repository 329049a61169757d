use super::*;

#[test]
fn bump_updates_year_and_all_time_together() {
    let mut c = PeriodCounter::new();
    c.bump(2023);
    c.bump(2023);
    c.bump(2024);

    assert_eq!(c.get(Period::Year(2023)), 2);
    assert_eq!(c.get(Period::Year(2024)), 1);
    assert_eq!(c.get(Period::AllTime), 3);
    assert_eq!(c.years().collect::<Vec<_>>(), vec![2023, 2024]);
}

#[test]
fn unseen_period_reads_zero() {
    let c = PeriodCounter::new();
    assert_eq!(c.get(Period::Year(1999)), 0);
    assert_eq!(c.get(Period::AllTime), 0);
    assert!(c.is_empty());
}

#[test]
fn adding_zero_creates_no_keys() {
    let mut c = PeriodCounter::new();
    c.add(2020, 0);
    assert!(c.is_empty());
}

#[test]
fn serializes_as_plain_object() {
    let mut c = PeriodCounter::new();
    c.add(2021, 4);
    assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"2021":4,"all":4}"#);
}
