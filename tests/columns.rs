use domain_tally::{columns::locate_email_column, error::ColumnError};
use proptest::prelude::*;

#[test]
fn exact_match() {
    assert_eq!(locate_email_column(&["one", "email", "three"]), Ok(1));
}

#[test]
fn close_match() {
    assert_eq!(
        locate_email_column(&["one", "the_email_address", "three"]),
        Ok(1)
    );
}

#[test]
fn exact_match_before_close_match() {
    assert_eq!(
        locate_email_column(&["one", "email", "the_email", "four"]),
        Ok(1)
    );
}

#[test]
fn close_match_before_exact_match() {
    assert_eq!(
        locate_email_column(&["one", "some_email_address", "email", "four"]),
        Ok(2)
    );
}

#[test]
fn no_match() {
    let err = locate_email_column(&["one", "two", "three", "four"]).unwrap_err();
    assert_eq!(err, ColumnError::NoEmailColumnFound);
    assert_eq!(err.to_string(), "no email column found");
}

#[test]
fn hyphenated_labels_match_both_tiers() {
    assert_eq!(locate_email_column(&["Customer E-Mail", "E-MAIL"]), Ok(1));
    assert_eq!(locate_email_column(&["id", "Work E-mail"]), Ok(1));
}

fn filler_header() -> impl Strategy<Value = String> {
    // Lowercase words without an 'e', so they can never contain "email".
    "[a-df-z_]{0,12}"
}

proptest! {
    #[test]
    fn exact_match_outranks_any_earlier_close_match(
        before in proptest::collection::vec(filler_header(), 0..5),
        after in proptest::collection::vec(filler_header(), 0..5),
        close_prefix in "[a-df-z]{1,6}",
        exact in prop_oneof![Just("email"), Just("EMAIL"), Just("E-Mail"), Just("e-mail")],
    ) {
        let mut headers = before.clone();
        headers.push(format!("{close_prefix}_email"));
        headers.push(exact.to_string());
        headers.extend(after);
        prop_assert_eq!(locate_email_column(headers.as_slice()), Ok(before.len() + 1));
    }

    #[test]
    fn first_close_match_wins_without_exact(
        before in proptest::collection::vec(filler_header(), 0..5),
        after in proptest::collection::vec(filler_header(), 0..5),
        suffix in "[a-df-z]{1,6}",
    ) {
        let mut headers = before.clone();
        headers.push(format!("primary_email_{suffix}"));
        headers.push(format!("secondary_e-mail_{suffix}"));
        headers.extend(after);
        prop_assert_eq!(locate_email_column(headers.as_slice()), Ok(before.len()));
    }

    #[test]
    fn headers_without_email_fail(
        headers in proptest::collection::vec(filler_header(), 0..8),
    ) {
        prop_assert_eq!(
            locate_email_column(headers.as_slice()),
            Err(ColumnError::NoEmailColumnFound)
        );
    }
}
