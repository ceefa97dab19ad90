use chrono::Month;
use offseason_promo::workflows::bookings::BookingLoader;
use offseason_promo::workflows::off_season::{detect_off_season, monthly_stats, DetectionError};
use offseason_promo::workflows::promotion::{plan_promotions, PromotionTier};

const TOLERANCE: f64 = 1e-9;

/// January, March and April cancel half their bookings; February one in ten.
fn seasonal_csv() -> String {
    let mut csv = String::from("hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month\n");
    for (month, canceled, total) in [
        ("January", 1, 2),
        ("February", 1, 10),
        ("March", 2, 4),
        ("April", 3, 6),
    ] {
        for index in 0..total {
            let flag = if index < canceled { 1 } else { 0 };
            csv.push_str(&format!("City Hotel,{flag},{index},2017,{month}\n"));
        }
    }
    csv
}

#[test]
fn february_is_the_only_off_season_month() {
    let records = BookingLoader::from_reader(seasonal_csv().as_bytes()).expect("dataset loads");
    assert_eq!(records.len(), 22);

    let detection = detect_off_season(&records).expect("detection succeeds");
    assert!((detection.overall_average - 0.4).abs() < TOLERANCE);

    assert_eq!(detection.entries.len(), 1);
    let february = detection
        .drop_for(Month::February)
        .expect("february retained");
    assert!((february - 75.0).abs() < TOLERANCE);

    for month in [Month::January, Month::March, Month::April] {
        assert_eq!(detection.drop_for(month), None, "{} excluded", month.name());
    }

    let plans = plan_promotions(&detection);
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].tier, PromotionTier::AggressivePromotion);
    assert_eq!(plans[0].title, "Special Offer in February");
    assert!(plans[0].email_html.contains("aggressive promotion in February"));
    assert!(plans[0].email_html.contains("75.00%"));
}

#[test]
fn excluded_months_sit_above_the_average() {
    let records = BookingLoader::from_reader(seasonal_csv().as_bytes()).expect("dataset loads");
    let detection = detect_off_season(&records).expect("detection succeeds");

    for stat in detection
        .monthly
        .iter()
        .filter(|stat| stat.month != Month::February)
    {
        let drop = (detection.overall_average - stat.mean_cancellation)
            / detection.overall_average
            * 100.0;
        assert!((drop + 25.0).abs() < TOLERANCE, "{} drop {drop}", stat.month.name());
    }
}

#[test]
fn drop_matches_formula_for_every_month() {
    let csv = "arrival_date_month,is_canceled\n\
               May,1\nMay,0\nMay,0\nMay,0\n\
               June,1\nJune,1\nJune,0\nJune,0\n\
               July,1\nJuly,1\nJuly,1\nJuly,0\n\
               August,1\nAugust,1\nAugust,1\nAugust,0\nAugust,0\n\
               August,0\nAugust,0\nAugust,0\nAugust,0\nAugust,0\n";
    let records = BookingLoader::from_reader(csv.as_bytes()).expect("dataset loads");
    let stats = monthly_stats(&records);
    let means: Vec<f64> = stats.iter().map(|stat| stat.mean_cancellation).collect();
    assert_eq!(means, vec![0.25, 0.5, 0.75, 0.3]);

    let overall = means.iter().sum::<f64>() / means.len() as f64;
    let detection = detect_off_season(&records).expect("detection succeeds");
    assert!((detection.overall_average - overall).abs() < TOLERANCE);

    // Only May (drop ~44%) and August (~33%) clear the 10% threshold.
    let may = detection.drop_for(Month::May).expect("may retained");
    let august = detection.drop_for(Month::August).expect("august retained");
    assert!((may - (overall - 0.25) / overall * 100.0).abs() < TOLERANCE);
    assert!((august - (overall - 0.3) / overall * 100.0).abs() < TOLERANCE);
    assert_eq!(detection.drop_for(Month::June), None);
    assert_eq!(detection.drop_for(Month::July), None);

    assert_eq!(PromotionTier::classify(may), PromotionTier::AggressivePromotion);
    assert_eq!(PromotionTier::classify(august), PromotionTier::LargeDiscount);
}

#[test]
fn identical_monthly_means_produce_no_promotions() {
    let mut csv = String::from("arrival_date_month,is_canceled\n");
    for month in ["Jan", "Feb", "Mar", "Apr", "May", "Jun"] {
        csv.push_str(&format!("{month},1\n{month},0\n"));
    }
    let records = BookingLoader::from_reader(csv.as_bytes()).expect("dataset loads");
    let detection = detect_off_season(&records).expect("detection succeeds");
    assert!(detection.is_empty());
    assert!(plan_promotions(&detection).is_empty());
}

#[test]
fn dataset_without_cancellations_cannot_be_scored() {
    let csv = "arrival_date_month,is_canceled\nJuly,0\nAugust,0\nAugust,0\n";
    let records = BookingLoader::from_reader(csv.as_bytes()).expect("dataset loads");
    assert_eq!(
        detect_off_season(&records),
        Err(DetectionError::DivisionByZero)
    );
}
