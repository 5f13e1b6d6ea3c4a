//! Point rule table and bundle bonuses.

use salestrack_core::{
    points::calculate_points,
    product::{LiabilityLimit, ProductKey::*},
};

#[test]
fn auto_alone_defaults_to_lowest_liability() {
    let p = calculate_points(&[Auto], None);
    assert_eq!((p.base, p.bonus, p.total), (1, 0, 1));
    assert!(p.bonus_reasons.is_empty());
}

#[test]
fn auto_scored_by_liability_limit() {
    assert_eq!(calculate_points(&[Auto], Some(LiabilityLimit::Limit50_100)).base, 2);
    assert_eq!(calculate_points(&[Auto], Some(LiabilityLimit::Limit100_300Plus)).base, 3);
}

#[test]
fn flat_products_sum_base_points() {
    let p = calculate_points(&[Motorcycle, Rv, Umbrella, Boat], None);
    assert_eq!(p.base, 8);
    assert_eq!(p.bonus, 0);

    let p = calculate_points(&[Home, Renters], Some(LiabilityLimit::Limit100_300Plus));
    assert_eq!(p.total, 4, "no bundle bonus without auto");
}

#[test]
fn home_auto_bundle_scales_with_liability() {
    let cases = [
        (LiabilityLimit::Below50_100, 1, "+1 Home & Auto bundle (below 50/100)"),
        (LiabilityLimit::Limit50_100, 2, "+2 Home & Auto bundle (50/100)"),
        (LiabilityLimit::Limit100_300Plus, 3, "+3 Home & Auto bundle (100/300+)"),
    ];
    for (liability, bonus, reason) in cases {
        let p = calculate_points(&[Home, Auto], Some(liability));
        assert_eq!(p.base, 3 + liability.points());
        assert_eq!(p.bonus, bonus);
        assert_eq!(p.bonus_reasons, vec![reason.to_string()]);
    }
}

#[test]
fn bundles_stack() {
    let p = calculate_points(&[Auto, Home, Renters], Some(LiabilityLimit::Limit50_100));
    assert_eq!(p.base, 2 + 3 + 1);
    assert_eq!(p.bonus, 1 + 2);
    assert_eq!(p.total, 9);
    assert_eq!(
        p.bonus_reasons,
        vec![
            "+1 Auto & Renters bundle".to_string(),
            "+2 Home & Auto bundle (50/100)".to_string(),
        ]
    );
}

#[test]
fn nothing_sold_scores_nothing() {
    let p = calculate_points(&[], Some(LiabilityLimit::Limit100_300Plus));
    assert_eq!(p.total, 0);
}
