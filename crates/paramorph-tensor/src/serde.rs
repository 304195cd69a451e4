use crate::Tensor;

use serde::ser::SerializeStruct;
use serde::Deserialize;

impl<T, const N: usize> serde::Serialize for Tensor<T, N>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Tensor", 2)?;
        state.serialize_field("data", self.as_slice())?;
        state.serialize_field("shape", &self.shape.to_vec())?;
        state.end()
    }
}

impl<'de, T, const N: usize> serde::Deserialize<'de> for Tensor<T, N>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TensorData<T> {
            data: Vec<T>,
            shape: Vec<usize>,
        }

        let TensorData { data, shape } = TensorData::deserialize(deserializer)?;

        let shape_array: [usize; N] = shape
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid shape"))?;

        // strides are always recomputed, only row-major layouts exist
        Tensor::from_shape_vec(shape_array, data).map_err(serde::de::Error::custom)
    }
}
