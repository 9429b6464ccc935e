use crate::recipe::{NutritionVector, NUTRITION_DIMENSION};

/// Per-feature standardisation fitted on one recipe subset.
///
/// Uses the population standard deviation; a constant feature keeps a scale
/// of 1 so it maps to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; NUTRITION_DIMENSION],
    scale: [f64; NUTRITION_DIMENSION],
}

impl StandardScaler {
    pub fn fit<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a NutritionVector>,
    {
        let rows: Vec<&NutritionVector> = rows.into_iter().collect();
        let mut mean = [0.0; NUTRITION_DIMENSION];
        let mut scale = [1.0; NUTRITION_DIMENSION];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for row in &rows {
            for (m, v) in mean.iter_mut().zip(row.as_array()) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = [0.0; NUTRITION_DIMENSION];
        for row in &rows {
            for (i, v) in row.as_array().iter().enumerate() {
                variance[i] += (v - mean[i]).powi(2);
            }
        }
        for (s, var) in scale.iter_mut().zip(variance) {
            let std = (var / n).sqrt();
            if std > 0.0 && std.is_finite() {
                *s = std;
            }
        }

        Self { mean, scale }
    }

    pub fn transform(&self, vector: &NutritionVector) -> [f64; NUTRITION_DIMENSION] {
        let mut out = [0.0; NUTRITION_DIMENSION];
        for (i, v) in vector.as_array().iter().enumerate() {
            out[i] = (v - self.mean[i]) / self.scale[i];
        }
        out
    }

    pub fn mean(&self) -> &[f64; NUTRITION_DIMENSION] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; NUTRITION_DIMENSION] {
        &self.scale
    }
}
