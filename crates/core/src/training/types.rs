use serde::{Deserialize, Serialize};

/// How an exercise is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Repeats,
    Time,
    Duration,
    Distance,
    Weight,
    TimeDistance,
    TimeRepeats,
}

impl ExerciseType {
    /// Returns true if rounds of this type record a duration in seconds.
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            ExerciseType::Time
                | ExerciseType::Duration
                | ExerciseType::TimeDistance
                | ExerciseType::TimeRepeats
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    Kg,
    Lb,
}

/// One recorded round of an exercise.
///
/// Per-side exercises record a `{left, right}` pair, everything else a single
/// value. The shape is fixed once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Round {
    Single(f64),
    Sides { left: f64, right: f64 },
}

impl Round {
    /// An empty round with the shape an exercise expects.
    pub fn empty(each_side: bool) -> Self {
        if each_side {
            Round::Sides {
                left: 0.0,
                right: 0.0,
            }
        } else {
            Round::Single(0.0)
        }
    }

    pub fn same_shape(&self, other: &Round) -> bool {
        matches!(
            (self, other),
            (Round::Single(_), Round::Single(_)) | (Round::Sides { .. }, Round::Sides { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_type_serializes_snake_case() {
        let json = serde_json::to_string(&ExerciseType::TimeDistance).unwrap();
        assert_eq!(json, r#""time_distance""#);
    }

    #[test]
    fn test_round_shapes_deserialize() {
        let rounds: Vec<Round> = serde_json::from_str(r#"[12, {"left": 5, "right": 6.5}]"#).unwrap();

        assert_eq!(rounds[0], Round::Single(12.0));
        assert_eq!(
            rounds[1],
            Round::Sides {
                left: 5.0,
                right: 6.5
            }
        );
    }

    #[test]
    fn test_same_shape() {
        assert!(Round::Single(1.0).same_shape(&Round::Single(3.0)));
        assert!(!Round::Single(1.0).same_shape(&Round::empty(true)));
        assert!(Round::empty(true).same_shape(&Round::Sides {
            left: 1.0,
            right: 2.0
        }));
    }

    #[test]
    fn test_is_timed() {
        assert!(ExerciseType::Time.is_timed());
        assert!(ExerciseType::TimeRepeats.is_timed());
        assert!(!ExerciseType::Repeats.is_timed());
        assert!(!ExerciseType::Weight.is_timed());
    }
}
