use crate::core::ranker::Roster;
use crate::domain::model::DoctorRecord;
use crate::utils::error::{Result, TriageError};
use std::io::Read;
use std::path::Path;

const BUILTIN_ROSTER: &str = include_str!("../../data/doctors.csv");

/// The roster shipped with the binary.
pub fn builtin_roster() -> Result<Roster> {
    parse_roster(BUILTIN_ROSTER.as_bytes())
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let file = std::fs::File::open(path.as_ref())?;
    let roster = parse_roster(file)?;
    tracing::info!(
        "📋 Loaded {} doctors from {}",
        roster.len(),
        path.as_ref().display()
    );
    Ok(roster)
}

/// Parse CSV with header `name,specialty,experience,rating,price`.
pub fn parse_roster<R: Read>(reader: R) -> Result<Roster> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut doctors = Vec::new();
    for (index, row) in csv_reader.deserialize::<DoctorRecord>().enumerate() {
        let doctor = row?;
        // 第 1 列為標題
        validate_record(&doctor, index + 2)?;
        doctors.push(doctor);
    }

    let roster = Roster::new(doctors);
    if roster.is_empty() {
        return Err(TriageError::RosterError {
            message: "roster contains no doctors".to_string(),
        });
    }

    Ok(roster)
}

fn validate_record(doctor: &DoctorRecord, line: usize) -> Result<()> {
    if doctor.name.is_empty() || doctor.specialty.is_empty() {
        return Err(TriageError::RosterError {
            message: format!("line {}: name and specialty are required", line),
        });
    }
    if !(0.0..=5.0).contains(&doctor.rating) {
        return Err(TriageError::RosterError {
            message: format!(
                "line {}: rating {} for {} is outside 0-5",
                line, doctor.rating, doctor.name
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_loads() {
        let roster = builtin_roster().unwrap();
        assert_eq!(roster.len(), 32);
        assert_eq!(roster.specialties().len(), 13);
        assert!(roster.specialties().contains(&"General Medicine"));
    }

    #[test]
    fn test_parse_trims_fields() {
        let csv = "name, specialty, experience, rating, price\nDr. A , Cardiology , 3 , 4.2 , 99\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();
        let doctor = &roster.doctors()[0];
        assert_eq!(doctor.name, "Dr. A");
        assert_eq!(doctor.specialty, "Cardiology");
        assert_eq!(doctor.experience, 3);
        assert_eq!(doctor.price, 99);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let csv = "name,specialty,experience,rating,price\nDr. A,Cardiology,3,7.5,99\n";
        let err = parse_roster(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let csv = "name,specialty,experience,rating,price\nDr. A,Cardiology,many,4.0,99\n";
        assert!(matches!(
            parse_roster(csv.as_bytes()),
            Err(TriageError::CsvError(_))
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let csv = "name,specialty,experience,rating,price\n";
        assert!(parse_roster(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_roster_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clinic.csv");
        std::fs::write(
            &path,
            "name,specialty,experience,rating,price\nDr. Z,Urology,30,4.1,140\n",
        )
        .unwrap();

        let roster = load_roster(&path).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.doctors()[0].specialty, "Urology");
    }
}
