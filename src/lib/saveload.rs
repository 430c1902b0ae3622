//! Serde helpers for compact storage of grid contents.

/// Helper module that converts a list of values into a run-length encoded vector of pairs when
/// serializing and deserializing it with Serde.
pub mod run_length_encoded {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<I, S, T>(source: I, s: S) -> Result<S::Ok, S::Error>
    where
        I: IntoIterator<Item = T>,
        S: Serializer,
        T: Copy + PartialEq + Serialize,
    {
        let mut buffer: Vec<(T, u32)> = Vec::new();

        for it in source {
            match buffer.last_mut() {
                Some(last) if last.0 == it && last.1 < u32::MAX => last.1 += 1,
                _ => buffer.push((it, 1)),
            }
        }

        buffer.serialize(s)
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Copy + Deserialize<'de>,
    {
        Ok(Vec::<(T, u32)>::deserialize(d)?
            .iter()
            .flat_map(|(it, n)| std::iter::repeat(*it).take(*n as usize))
            .collect::<Vec<T>>())
    }
}

/// Helper module that converts a BitVec into a run-length encoded list of u8s for Serde.
pub mod bit_vec {
    use bitvec::prelude::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(bit_vec: &BitVec, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::run_length_encoded::serialize(
            bit_vec.iter().by_vals().map(|b| if b { 1u8 } else { 0u8 }),
            s,
        )
    }

    pub fn deserialize<'de, D>(d: D) -> Result<BitVec, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(super::run_length_encoded::deserialize::<_, u8>(d)?
            .iter()
            .map(|n| *n != 0)
            .collect::<BitVec>())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct Cells {
        #[serde(with = "super::run_length_encoded")]
        cells: Vec<u8>,
    }

    #[test]
    fn runs_are_collapsed() {
        let cells = Cells {
            cells: vec![0, 0, 0, 4, 4, 1],
        };
        let json = serde_json::to_string(&cells).unwrap();

        assert_eq!(json, r#"{"cells":[[0,3],[4,2],[1,1]]}"#);
        assert_eq!(serde_json::from_str::<Cells>(&json).unwrap(), cells);
    }
}
