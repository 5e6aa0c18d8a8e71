//! Regression coverage for claim domain types.

use super::*;
use crate::domain::catalogue::{DealDraft, RestaurantDraft, SavingsEstimate};
use crate::domain::{DisplayName, EmailAddress};
use rstest::{fixture, rstest};

fn deal(title: &str, limit: u32) -> DealDraft {
    DealDraft {
        deal_title: title.to_owned(),
        deal_description: format!("{title} with any pizza"),
        potential_savings: SavingsEstimate {
            average: "$8".to_owned(),
            up_to: "$12".to_owned(),
        },
        offer_per_customer_limit: limit,
    }
}

#[fixture]
fn source() -> Restaurant {
    Restaurant::new(RestaurantDraft {
        name: "Source".to_owned(),
        image: "https://example.test/source.jpg".to_owned(),
        location: "Cambridge".to_owned(),
        neighborhood: "Harvard Square".to_owned(),
        rating: 4.4,
        price_range: "$$".to_owned(),
        cuisine: "Pizza".to_owned(),
        deal_text: "Free dessert".to_owned(),
        deal_description: "Free dessert with any pizza".to_owned(),
        full_description: String::new(),
        address: String::new(),
        opening_hours: vec![],
        phone_number: String::new(),
        website: String::new(),
        menu_highlights: vec![],
        deals: vec![deal("Free dessert", 1), deal("Free draft beer", 2)],
    })
    .expect("valid restaurant")
}

#[fixture]
fn user() -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::random(),
        EmailAddress::new("ada@example.com").expect("valid email"),
        Some(DisplayName::new("Ada").expect("valid name")),
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

#[rstest]
fn request_copies_the_selected_deal(source: Restaurant, user: AuthenticatedUser) {
    let request = ClaimRequest::new(user, &source, 1, None, today()).expect("valid request");

    assert_eq!(request.restaurant_id().as_ref(), "source");
    assert_eq!(request.deal_title(), "Free draft beer");
    assert_eq!(request.limit(), OfferLimit::new(2));
    assert_eq!(request.deal_index(), 1);
}

#[rstest]
fn request_rejects_out_of_range_index(source: Restaurant, user: AuthenticatedUser) {
    let err = ClaimRequest::new(user, &source, 2, None, today()).expect_err("index 2");
    assert_eq!(
        err,
        ClaimValidationError::DealIndexOutOfRange {
            restaurant: "Source".to_owned(),
            index: 2,
            available: 2,
        }
    );
}

#[rstest]
#[case(-1, false)]
#[case(0, true)]
#[case(3, true)]
fn request_checks_redemption_date(
    source: Restaurant,
    user: AuthenticatedUser,
    #[case] offset_days: i64,
    #[case] accepted: bool,
) {
    let date = today() + Duration::days(offset_days);
    let result = ClaimRequest::new(user, &source, 0, Some(date), today());
    assert_eq!(result.is_ok(), accepted, "{result:?}");
}

#[rstest]
fn limit_scope_selects_the_counting_key(source: Restaurant, user: AuthenticatedUser) {
    let request = ClaimRequest::new(user, &source, 0, None, today()).expect("valid request");

    let restaurant_key = LimitScope::Restaurant.key_for(&request);
    let deal_key = LimitScope::Deal.key_for(&request);

    assert_eq!(restaurant_key.deal_title, None);
    assert_eq!(deal_key.deal_title.as_deref(), Some("Free dessert"));
    assert_ne!(restaurant_key.canonical(), deal_key.canonical());
}

#[rstest]
fn count_key_matches_by_scope(source: Restaurant, user: AuthenticatedUser) {
    let dessert = ClaimRequest::new(user.clone(), &source, 0, None, today()).expect("dessert");
    let beer = ClaimRequest::new(user, &source, 1, None, today()).expect("beer");
    let code = ConfirmationCode::from_parts("Source", "AAAA0000").expect("code");
    let now = Utc::now();
    let dessert_claim = ClaimedDeal::from_request(&dessert, code, now, now);

    assert!(LimitScope::Restaurant.key_for(&beer).matches(&dessert_claim));
    assert!(!LimitScope::Deal.key_for(&beer).matches(&dessert_claim));
    assert!(LimitScope::Deal.key_for(&dessert).matches(&dessert_claim));
}

#[rstest]
#[case("restaurant", LimitScope::Restaurant)]
#[case(" Deal ", LimitScope::Deal)]
fn limit_scope_parses(#[case] raw: &str, #[case] expected: LimitScope) {
    assert_eq!(raw.parse::<LimitScope>(), Ok(expected));
}

#[rstest]
#[case("The Boiling Crab", "THEBO")]
#[case("Joe's Pizza", "JOESP")]
#[case("Source", "SOURC")]
#[case("Sea", "SEA")]
#[case("!!!", "DEAL")]
fn confirmation_prefix(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(ConfirmationCode::prefix_for(name), expected);
}

#[rstest]
#[case("4K9Z2QX")]
#[case("4K9Z2QX1Z")]
#[case("4k9z2qx1")]
#[case("4K9Z-QX1")]
fn confirmation_suffix_must_be_eight_upper_alphanumerics(#[case] suffix: &str) {
    assert_eq!(
        ConfirmationCode::from_parts("Source", suffix),
        Err(ClaimValidationError::InvalidConfirmationSuffix { expected: 8 })
    );
}

#[rstest]
fn expiry_defaults_to_seven_days() {
    let claimed_at = Utc
        .with_ymd_and_hms(2026, 3, 14, 18, 30, 0)
        .single()
        .expect("valid instant");
    let expires = ExpiryPolicy::default().expires_at(claimed_at, None);
    assert_eq!(expires, claimed_at + Duration::days(7));
}

#[rstest]
fn expiry_uses_end_of_redemption_day() {
    let claimed_at = Utc
        .with_ymd_and_hms(2026, 3, 14, 18, 30, 0)
        .single()
        .expect("valid instant");
    let redeem_on = NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date");

    let expires = ExpiryPolicy::default().expires_at(claimed_at, Some(redeem_on));

    let expected = Utc
        .with_ymd_and_hms(2026, 3, 20, 23, 59, 59)
        .single()
        .expect("valid instant");
    assert_eq!(expires, expected);
}

#[rstest]
fn claim_record_mirrors_the_request(source: Restaurant, user: AuthenticatedUser) {
    let request = ClaimRequest::new(user.clone(), &source, 0, None, today()).expect("request");
    let code = ConfirmationCode::from_parts("Source", "4K9Z2QX1").expect("code");
    let now = Utc::now();

    let claim = ClaimedDeal::from_request(&request, code.clone(), now, now + Duration::days(7));

    assert_eq!(&claim.user_id, user.id());
    assert_eq!(&claim.user_email, user.email());
    assert_eq!(claim.restaurant_name, "Source");
    assert_eq!(claim.deal_title, "Free dessert");
    assert_eq!(claim.deal_description, "Free dessert with any pizza");
    assert_eq!(claim.confirmation_code, code);
    assert_eq!(claim.claimed_at, now);
}

#[rstest]
fn admin_policy_matches_normalised_emails(user: AuthenticatedUser) {
    let policy = AdminPolicy::new([EmailAddress::new("ADA@example.com").expect("valid")]);
    assert!(policy.is_admin(&user));

    let other = AuthenticatedUser::new(
        UserId::random(),
        EmailAddress::new("bob@example.com").expect("valid"),
        None,
    );
    assert!(!policy.is_admin(&other));
}

#[rstest]
#[case(None, true)]
#[case(Some("   "), true)]
#[case(Some("ADA@"), true)]
#[case(Some("source"), true)]
#[case(Some("dessert"), true)]
#[case(Some("burger"), false)]
fn ledger_filter(
    source: Restaurant,
    user: AuthenticatedUser,
    #[case] query: Option<&str>,
    #[case] expected: bool,
) {
    let request = ClaimRequest::new(user, &source, 0, None, today()).expect("request");
    let code = ConfirmationCode::from_parts("Source", "4K9Z2QX1").expect("code");
    let now = Utc::now();
    let claim = ClaimedDeal::from_request(&request, code, now, now);

    assert_eq!(ClaimLedgerFilter::new(query).matches(&claim), expected);
}

#[rstest]
fn only_post_record_phases_are_persisted() {
    assert!(!ClaimPhase::RecordFailed.is_persisted());
    assert!(!ClaimPhase::Rejected.is_persisted());
    assert!(ClaimPhase::NotifyFailed.is_persisted());
}
