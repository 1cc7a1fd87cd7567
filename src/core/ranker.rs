use crate::domain::model::{DoctorRecord, PricePreference};
use std::cmp::Ordering;
use std::sync::Arc;

/// At most this many doctors are recommended per request.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Read-only doctor roster shared by every request.
///
/// Cloning only bumps a reference count; there is no API to mutate entries
/// after construction.
#[derive(Debug, Clone)]
pub struct Roster {
    doctors: Arc<[DoctorRecord]>,
}

impl Roster {
    pub fn new(doctors: Vec<DoctorRecord>) -> Self {
        Self {
            doctors: doctors.into(),
        }
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    /// Distinct specialties in roster order.
    pub fn specialties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for doctor in self.doctors.iter() {
            if !seen
                .iter()
                .any(|s| s.to_lowercase() == doctor.specialty.to_lowercase())
            {
                seen.push(&doctor.specialty);
            }
        }
        seen
    }
}

#[derive(Debug, Clone)]
pub struct DoctorRanker {
    roster: Roster,
}

impl DoctorRanker {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Up to three doctors for `specialty`, ordered by `preference`.
    ///
    /// Specialty matching is exact after case folding. When nothing matches, the
    /// three best-rated doctors of the whole roster are returned instead and the
    /// preference is ignored.
    pub fn find_doctors(&self, specialty: &str, preference: PricePreference) -> Vec<DoctorRecord> {
        tracing::debug!(
            "🔎 Looking for specialty '{}' with {} price preference",
            specialty,
            preference
        );

        let wanted = specialty.to_lowercase();
        let mut matches: Vec<DoctorRecord> = self
            .roster
            .doctors()
            .iter()
            .filter(|doctor| doctor.specialty.to_lowercase() == wanted)
            .cloned()
            .collect();

        tracing::debug!("Found {} doctors for {}", matches.len(), specialty);

        if matches.is_empty() {
            tracing::info!("No exact match for '{}', using top-rated fallback", specialty);
            return self.top_rated();
        }

        // sort_by 為穩定排序，作用在篩選後的複本上
        matches.sort_by(comparator(preference));
        matches.truncate(MAX_RECOMMENDATIONS);

        for doctor in &matches {
            tracing::debug!(
                "  - {} ({}) - Rating: {}, Price: ${}",
                doctor.name,
                doctor.specialty,
                doctor.rating,
                doctor.price
            );
        }

        matches
    }

    /// Best-rated doctors overall, cheaper first on equal rating.
    pub fn top_rated(&self) -> Vec<DoctorRecord> {
        let mut all = self.roster.doctors().to_vec();
        all.sort_by(by_rating_then_price);
        all.truncate(MAX_RECOMMENDATIONS);
        all
    }
}

/// Ordering used for a price preference:
///
/// - `Medium`: rating descending, then price ascending
/// - `Low`: price ascending, then rating descending
/// - `High`: rating descending, then experience descending
///
/// Remaining ties keep the `Medium` order.
pub fn comparator(preference: PricePreference) -> fn(&DoctorRecord, &DoctorRecord) -> Ordering {
    match preference {
        PricePreference::Medium => by_rating_then_price,
        PricePreference::Low => |a: &DoctorRecord, b: &DoctorRecord| {
            a.price
                .cmp(&b.price)
                .then_with(|| b.rating.total_cmp(&a.rating))
        },
        PricePreference::High => |a: &DoctorRecord, b: &DoctorRecord| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.experience.cmp(&a.experience))
                .then_with(|| a.price.cmp(&b.price))
        },
    }
}

fn by_rating_then_price(a: &DoctorRecord, b: &DoctorRecord) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.price.cmp(&b.price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(name: &str, specialty: &str, experience: u32, rating: f64, price: u32) -> DoctorRecord {
        DoctorRecord {
            name: name.to_string(),
            specialty: specialty.to_string(),
            experience,
            rating,
            price,
        }
    }

    fn sample_ranker() -> DoctorRanker {
        DoctorRanker::new(Roster::new(vec![
            doctor("A", "Cardiology", 15, 4.9, 200),
            doctor("B", "Cardiology", 10, 4.9, 150),
            doctor("C", "Cardiology", 22, 4.7, 120),
            doctor("D", "Cardiology", 8, 4.5, 100),
            doctor("E", "Dermatology", 12, 4.8, 150),
            doctor("F", "Dermatology", 6, 4.6, 150),
            doctor("G", "Neurology", 18, 5.0, 220),
        ]))
    }

    fn names(doctors: &[DoctorRecord]) -> Vec<&str> {
        doctors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_medium_sorts_by_rating_then_price() {
        let result = sample_ranker().find_doctors("Cardiology", PricePreference::Medium);
        assert_eq!(names(&result), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_low_sorts_by_price_then_rating() {
        let ranker = sample_ranker();
        let result = ranker.find_doctors("Cardiology", PricePreference::Low);
        assert_eq!(names(&result), vec!["D", "C", "B"]);

        let result = ranker.find_doctors("Dermatology", PricePreference::Low);
        assert_eq!(names(&result), vec!["E", "F"]);
    }

    #[test]
    fn test_high_sorts_by_rating_then_experience() {
        let result = sample_ranker().find_doctors("Cardiology", PricePreference::High);
        assert_eq!(names(&result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_high_ties_on_rating_and_experience_prefer_lower_price() {
        let ranker = DoctorRanker::new(Roster::new(vec![
            doctor("Pricey", "Urology", 12, 4.6, 180),
            doctor("Cheap", "Urology", 12, 4.6, 120),
            doctor("Senior", "Urology", 20, 4.6, 200),
            doctor("Junior", "Urology", 3, 4.8, 90),
        ]));

        let result = ranker.find_doctors("Urology", PricePreference::High);
        assert_eq!(names(&result), vec!["Junior", "Senior", "Cheap"]);
    }

    #[test]
    fn test_specialty_match_is_case_insensitive_but_exact() {
        let ranker = sample_ranker();
        assert_eq!(ranker.find_doctors("cARDIOLOGY", PricePreference::Medium).len(), 3);

        // "Cardio" 不是完整名稱，應走後備邏輯
        let fallback = ranker.find_doctors("Cardio", PricePreference::Low);
        assert_eq!(names(&fallback), vec!["G", "B", "A"]);
    }

    #[test]
    fn test_fewer_matches_are_not_padded() {
        let result = sample_ranker().find_doctors("Neurology", PricePreference::Medium);
        assert_eq!(names(&result), vec!["G"]);
    }

    #[test]
    fn test_roster_is_not_reordered() {
        let ranker = sample_ranker();
        let before = ranker.roster().doctors().to_vec();
        ranker.find_doctors("Cardiology", PricePreference::Low);
        ranker.find_doctors("Unknown", PricePreference::High);
        assert_eq!(ranker.roster().doctors(), before.as_slice());
    }

    #[test]
    fn test_specialties_are_distinct() {
        assert_eq!(
            sample_ranker().roster().specialties(),
            vec!["Cardiology", "Dermatology", "Neurology"]
        );
    }

    #[test]
    fn test_empty_roster_returns_nothing() {
        let ranker = DoctorRanker::new(Roster::new(Vec::new()));
        assert!(ranker.find_doctors("Cardiology", PricePreference::Medium).is_empty());
    }
}
