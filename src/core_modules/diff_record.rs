// THEORY:
// A `DiffRecord` is the answer key for one difference: where it is, how big it is,
// and which algorithm made it. It is built by the engine from the region and the
// algorithm it actually dispatched, never from anything the transform reports about
// itself, so position and size are always consistent with the selected region.

use crate::core_modules::algorithm_selector::AlgorithmId;
use crate::core_modules::region::region::{Point, Region};

/// The reported descriptor of one applied difference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffRecord {
    /// Centroid of the changed region.
    pub position: Point,
    /// Mean of the region's width and height.
    pub size: f32,
    /// Serialized as the numeric id under `algorithm_id`.
    #[cfg_attr(feature = "serde", serde(rename = "algorithm_id"))]
    pub algorithm: AlgorithmId,
}

impl DiffRecord {
    pub fn for_region(region: &Region, algorithm: AlgorithmId) -> Self {
        Self {
            position: region.centroid(),
            size: region.mean_side(),
            algorithm,
        }
    }

    /// The stable numeric id (0-9) of the algorithm.
    pub fn algorithm_id(&self) -> u8 {
        self.algorithm.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_derived_from_the_region() {
        let record = DiffRecord::for_region(&Region::new(10, 10, 40, 20), AlgorithmId::Blur);
        assert_eq!(record.position.x, 30.0);
        assert_eq!(record.position.y, 20.0);
        assert_eq!(record.size, 30.0);
        assert_eq!(record.algorithm_id(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_carries_the_numeric_algorithm_id() {
        let record = DiffRecord::for_region(&Region::new(0, 0, 40, 40), AlgorithmId::Flip);
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["algorithm_id"], serde_json::json!(7));
        assert_eq!(json["size"], serde_json::json!(40.0));
        assert_eq!(json["position"]["x"], serde_json::json!(20.0));
        assert!(json.get("algorithm").is_none());

        let back: DiffRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
        assert!(serde_json::from_str::<AlgorithmId>("12").is_err());
    }
}
