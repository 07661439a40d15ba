use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentType {
    GeneralCheckup => "General Checkup",
    Dental => "Dental",
    Vision => "Vision",
    Specialist => "Specialist",
    Vaccination => "Vaccination",
    FollowUp => "Follow-up",
    Emergency => "Emergency",
    LabWork => "Lab Work",
    PhysicalTherapy => "Physical Therapy",
    MentalHealth => "Mental Health",
    Veterinary => "Veterinary",
    Other => "Other",
});

impl AppointmentType {
    /// All types the structuring prompt may assign directly.
    /// "Other" is excluded: it is only a fallback when confidence is high
    /// enough but no listed type matches.
    pub fn assignable() -> &'static [&'static str] {
        &[
            "General Checkup",
            "Dental",
            "Vision",
            "Specialist",
            "Vaccination",
            "Follow-up",
            "Emergency",
            "Lab Work",
            "Physical Therapy",
            "Mental Health",
            "Veterinary",
        ]
    }
}

str_enum!(ProcessingStatus {
    Completed => "completed",
    Failed => "failed",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_type_round_trip() {
        for (variant, s) in [
            (AppointmentType::GeneralCheckup, "General Checkup"),
            (AppointmentType::Dental, "Dental"),
            (AppointmentType::Vision, "Vision"),
            (AppointmentType::Specialist, "Specialist"),
            (AppointmentType::Vaccination, "Vaccination"),
            (AppointmentType::FollowUp, "Follow-up"),
            (AppointmentType::Emergency, "Emergency"),
            (AppointmentType::LabWork, "Lab Work"),
            (AppointmentType::PhysicalTherapy, "Physical Therapy"),
            (AppointmentType::MentalHealth, "Mental Health"),
            (AppointmentType::Veterinary, "Veterinary"),
            (AppointmentType::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn assignable_excludes_other() {
        assert!(!AppointmentType::assignable().contains(&"Other"));
        assert_eq!(AppointmentType::assignable().len(), 11);
    }

    #[test]
    fn processing_status_round_trip() {
        for (variant, s) in [
            (ProcessingStatus::Completed, "completed"),
            (ProcessingStatus::Failed, "failed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ProcessingStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AppointmentType::from_str("Surgery").is_err());
        assert!(ProcessingStatus::from_str("").is_err());
    }
}
