use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use housenet_data::{Column, Frame};

const OCEAN_CATEGORIES: [&str; 5] = ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"];

/// Generates a synthetic census-style housing table with the same schema
/// as the California housing CSV: eight numeric feature columns, one
/// categorical column and a `median_house_value` target correlated with
/// the features. About 5% of `total_bedrooms` entries are missing (NaN).
pub fn synthetic_housing(n_samples: usize, seed: Option<u64>) -> Frame {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut longitude = Vec::with_capacity(n_samples);
    let mut latitude = Vec::with_capacity(n_samples);
    let mut age = Vec::with_capacity(n_samples);
    let mut rooms = Vec::with_capacity(n_samples);
    let mut bedrooms = Vec::with_capacity(n_samples);
    let mut population = Vec::with_capacity(n_samples);
    let mut households = Vec::with_capacity(n_samples);
    let mut income = Vec::with_capacity(n_samples);
    let mut ocean = Vec::with_capacity(n_samples);
    let mut value = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let lon = -124.0 + rng.gen::<f64>() * 10.0;
        let lat = 32.0 + rng.gen::<f64>() * 10.0;
        let hh = 50.0 + rng.gen::<f64>() * 1000.0;
        let rm = hh * (3.0 + rng.gen::<f64>() * 4.0);
        let bd = rm * (0.15 + rng.gen::<f64>() * 0.1);
        let pop = hh * (2.0 + rng.gen::<f64>() * 2.0);
        let a = 1.0 + rng.gen::<f64>() * 51.0;
        let inc = 0.5 + rng.gen::<f64>() * 14.5;
        let cat = OCEAN_CATEGORIES[rng.gen_range(0..OCEAN_CATEGORIES.len())];

        // Income dominates; coastal proximity adds a premium.
        let coastal = if cat == "INLAND" { 0.0 } else { 30_000.0 };
        let v = (20_000.0 + 38_000.0 * inc + 300.0 * a + coastal
            + 15_000.0 * gaussian(&mut rng))
            .clamp(15_000.0, 500_001.0);

        longitude.push(lon);
        latitude.push(lat);
        age.push(a);
        rooms.push(rm);
        bedrooms.push(if rng.gen::<f64>() < 0.05 { f64::NAN } else { bd });
        population.push(pop);
        households.push(hh);
        income.push(inc);
        ocean.push(cat.to_string());
        value.push(v);
    }

    let names = [
        "longitude",
        "latitude",
        "housing_median_age",
        "total_rooms",
        "total_bedrooms",
        "population",
        "households",
        "median_income",
        "ocean_proximity",
        "median_house_value",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let columns = vec![
        Column::Numeric(longitude),
        Column::Numeric(latitude),
        Column::Numeric(age),
        Column::Numeric(rooms),
        Column::Numeric(bedrooms),
        Column::Numeric(population),
        Column::Numeric(households),
        Column::Numeric(income),
        Column::Categorical(ocean),
        Column::Numeric(value),
    ];

    Frame::new(names, columns).expect("columns are generated with equal length")
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_matches_the_census_table() {
        let f = synthetic_housing(50, Some(0));
        assert_eq!(f.n_rows(), 50);
        assert_eq!(f.n_cols(), 10);
        assert!(matches!(
            f.column("ocean_proximity").unwrap(),
            Column::Categorical(_)
        ));
        assert!(matches!(
            f.column("median_house_value").unwrap(),
            Column::Numeric(_)
        ));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = synthetic_housing(20, Some(42));
        let b = synthetic_housing(20, Some(42));
        // NaN-free columns compare exactly.
        assert_eq!(
            a.column("median_income").unwrap(),
            b.column("median_income").unwrap()
        );
        assert_eq!(
            a.column("ocean_proximity").unwrap(),
            b.column("ocean_proximity").unwrap()
        );
    }

    #[test]
    fn power_columns_stay_positive() {
        let f = synthetic_housing(200, Some(7));
        for name in [
            "housing_median_age",
            "total_rooms",
            "population",
            "households",
            "median_income",
        ] {
            match f.column(name).unwrap() {
                Column::Numeric(v) => assert!(v.iter().all(|&x| x > 0.0)),
                _ => panic!("expected numeric column"),
            }
        }
    }

    #[test]
    fn some_bedrooms_are_missing() {
        let f = synthetic_housing(500, Some(3));
        match f.column("total_bedrooms").unwrap() {
            Column::Numeric(v) => {
                let missing = v.iter().filter(|x| x.is_nan()).count();
                assert!(missing > 0);
                assert!(v.iter().filter(|x| !x.is_nan()).all(|&x| x > 0.0));
            }
            _ => panic!("expected numeric column"),
        }
    }
}
