use job_scout::pay::{parse_amount, pay_figure, scan_pay_range};

#[test]
fn range_is_returned_verbatim() {
    let text = "The base pay range is $109,700 - $203,600 per year plus equity.";
    assert_eq!(scan_pay_range(text), vec!["$109,700 - $203,600"]);
}

#[test]
fn highest_upper_bound_wins_in_any_order() {
    let a = "Level 1: $50,000 - $60,000. Level 2: $90,000 - $120,000.";
    let b = "Level 2: $90,000 - $120,000. Level 1: $50,000 - $60,000.";
    assert_eq!(scan_pay_range(a), vec!["$90,000 - $120,000"]);
    assert_eq!(scan_pay_range(b), vec!["$90,000 - $120,000"]);
}

#[test]
fn experience_spans_are_not_pay() {
    assert!(scan_pay_range("You have 3-5 years of experience.").is_empty());
    assert_eq!(pay_figure("You have 3-5 years of experience."), "Unknown");
}

#[test]
fn single_amounts_follow_priority_and_dedup() {
    let text = "Pays $45 per hour, or $90,000 a year. Signing bonus $5,000 and $5,000 relocation.";
    assert_eq!(
        scan_pay_range(text),
        vec!["$90,000 a year", "$45 per hour", "$45", "$90,000", "$5,000"]
    );
    assert_eq!(pay_figure(text), "$90,000 a year");
}

#[test]
fn range_without_currency_beats_single_amounts() {
    assert_eq!(
        scan_pay_range("Salary: 120,000 - 150,000 per year"),
        vec!["120,000 - 150,000"]
    );
    assert_eq!(scan_pay_range("Band 90k to 110k"), vec!["90k to 110k"]);
}

#[test]
fn small_bare_ranges_still_need_a_currency() {
    assert!(scan_pay_range("Expect 2-3 interviews over 10-14 days.").is_empty());
}

#[test]
fn parses_grouped_and_shorthand_amounts() {
    assert_eq!(parse_amount("109,700"), Some(109_700.0));
    assert_eq!(parse_amount("150k"), Some(150_000.0));
    assert_eq!(parse_amount("42.50"), Some(42.5));
    assert_eq!(parse_amount("abc"), None);
}
