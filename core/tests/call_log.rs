//! Building call entries from the log form.

use chrono::{TimeZone, Utc};
use salestrack_core::{
    call_log::{generate_id, CallDraft},
    product::{CallResult, LiabilityLimit, ProductKey},
};

fn sale(products: &[ProductKey], liability: LiabilityLimit) -> CallDraft {
    let mut draft = CallDraft::new();
    draft.liability = liability;
    for p in products {
        draft.toggle_product(*p);
    }
    draft
}

#[test]
fn new_draft_matches_form_defaults() {
    let draft = CallDraft::new();
    assert_eq!(draft.result, CallResult::Sale);
    assert_eq!(draft.liability, LiabilityLimit::Limit50_100);
    assert!(draft.products().is_empty());
    assert_eq!(draft.preview().total, 0);
}

#[test]
fn sale_entry_carries_points_and_premium() {
    let mut draft = sale(&[ProductKey::Auto, ProductKey::Home], LiabilityLimit::Limit100_300Plus);
    draft.set_premium(ProductKey::Auto, "1,200.50");
    draft.set_premium(ProductKey::Home, "$800");
    draft.notes = "bundled at renewal".into();

    let now = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap();
    let entry = draft.into_entry(now);

    assert_eq!(entry.timestamp, now);
    assert_eq!(entry.products, vec![ProductKey::Auto, ProductKey::Home]);
    assert_eq!(entry.liability_limit, Some(LiabilityLimit::Limit100_300Plus));
    assert_eq!(entry.points, 6);
    assert_eq!(entry.bonus_points, 3);
    assert_eq!(entry.total_points(), 9);
    assert_eq!(entry.bonus_reasons.len(), 1);
    assert!((entry.premium - 2000.5).abs() < 1e-9);
    assert_eq!(entry.notes.as_deref(), Some("bundled at renewal"));
}

#[test]
fn liability_only_recorded_when_auto_sold() {
    let entry = sale(&[ProductKey::Home], LiabilityLimit::Limit100_300Plus).into_entry(Utc::now());
    assert_eq!(entry.liability_limit, None);
    assert_eq!(entry.points, 3);
}

#[test]
fn deselecting_a_product_drops_its_premium() {
    let mut draft = sale(&[ProductKey::Auto, ProductKey::Boat], LiabilityLimit::Limit50_100);
    draft.set_premium(ProductKey::Auto, "500");
    draft.set_premium(ProductKey::Boat, "250");
    assert!((draft.premium_total() - 750.0).abs() < 1e-9);

    draft.toggle_product(ProductKey::Boat);
    assert_eq!(draft.premium_input(ProductKey::Boat), None);
    assert!((draft.premium_total() - 500.0).abs() < 1e-9);

    draft.toggle_product(ProductKey::Boat);
    assert_eq!(draft.products(), &[ProductKey::Auto, ProductKey::Boat]);
    assert!((draft.premium_total() - 500.0).abs() < 1e-9);
}

#[test]
fn unreadable_premium_counts_as_zero() {
    let mut draft = sale(&[ProductKey::Renters], LiabilityLimit::Limit50_100);
    draft.set_premium(ProductKey::Renters, "abc");
    assert_eq!(draft.into_entry(Utc::now()).premium, 0.0);
}

#[test]
fn non_sale_outcomes_carry_no_products_or_points() {
    for result in [CallResult::NoSale, CallResult::Voicemail, CallResult::Other] {
        let mut draft = sale(&[ProductKey::Auto, ProductKey::Home], LiabilityLimit::Limit100_300Plus);
        draft.set_premium(ProductKey::Home, "900");
        draft.result = result;
        draft.notes = "call back Tuesday".into();

        let entry = draft.into_entry(Utc::now());
        assert_eq!(entry.result, result);
        assert!(entry.products.is_empty());
        assert_eq!(entry.liability_limit, None);
        assert_eq!(entry.total_points(), 0);
        assert!(entry.bonus_reasons.is_empty());
        assert_eq!(entry.premium, 0.0);
        assert_eq!(entry.notes.as_deref(), Some("call back Tuesday"));
    }
}

#[test]
fn blank_notes_are_dropped() {
    let mut draft = CallDraft::new();
    draft.notes = "   ".into();
    assert_eq!(draft.into_entry(Utc::now()).notes, None);
}

#[test]
fn reset_clears_the_form() {
    let mut draft = sale(&[ProductKey::Auto], LiabilityLimit::Below50_100);
    draft.result = CallResult::Other;
    draft.reset();
    assert_eq!(draft, CallDraft::new());
}

#[test]
fn ids_are_short_and_distinct() {
    let a = generate_id();
    let b = generate_id();
    assert_eq!(a.len(), 8);
    assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert_ne!(a, b);
}
