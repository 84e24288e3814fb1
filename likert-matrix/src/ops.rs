//! Basic matrix operations
//!
//! Every operation returns a new matrix; inputs are never mutated.

use likert_core::StatsError;
use crate::types::Matrix;

impl Matrix {
    pub fn transpose(&self) -> Matrix {
        Matrix::from_dmatrix(self.as_dmatrix().transpose())
    }

    /// Multiply every element by `scalar`
    pub fn scale(&self, scalar: f64) -> Matrix {
        Matrix::from_dmatrix(self.as_dmatrix() * scalar)
    }

    /// Element-wise `self - other`
    pub fn sub(&self, other: &Matrix) -> Result<Matrix, StatsError> {
        check_same_dims(self, other, "sub")?;
        Ok(Matrix::from_dmatrix(self.as_dmatrix() - other.as_dmatrix()))
    }

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, StatsError> {
        if self.cols() != other.rows() {
            return Err(StatsError::shape(format!(
                "matmul: incompatible dimensions {}×{} and {}×{}",
                self.rows(),
                self.cols(),
                other.rows(),
                other.cols()
            )));
        }
        Ok(Matrix::from_dmatrix(self.as_dmatrix() * other.as_dmatrix()))
    }

    /// Matrix-vector product `self · v`
    pub fn mat_vec(&self, v: &[f64]) -> Result<Vec<f64>, StatsError> {
        if self.cols() != v.len() {
            return Err(StatsError::shape(format!(
                "mat_vec: matrix has {} columns, vector has {} elements",
                self.cols(),
                v.len()
            )));
        }
        Ok((0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self[(i, j)] * v[j]).sum())
            .collect())
    }

    /// Outer product `v · vᵀ`
    pub fn outer(v: &[f64]) -> Matrix {
        let n = v.len();
        let mut result = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                result[(i, j)] = v[i] * v[j];
            }
        }
        result
    }

    /// Extract the rows and columns at the given indices, in order
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Result<Matrix, StatsError> {
        if rows.is_empty() || cols.is_empty() {
            return Err(StatsError::shape("submatrix: empty row or column selection"));
        }
        if rows.iter().any(|&i| i >= self.rows()) || cols.iter().any(|&j| j >= self.cols()) {
            return Err(StatsError::shape(format!(
                "submatrix: index out of bounds for {}×{} matrix",
                self.rows(),
                self.cols()
            )));
        }

        let mut result = Matrix::zeros(rows.len(), cols.len());
        for (ri, &i) in rows.iter().enumerate() {
            for (ci, &j) in cols.iter().enumerate() {
                result[(ri, ci)] = self[(i, j)];
            }
        }
        Ok(result)
    }

    /// Same matrix without row `i` and column `j` (cofactor minor)
    pub fn minor(&self, i: usize, j: usize) -> Result<Matrix, StatsError> {
        let rows: Vec<usize> = (0..self.rows()).filter(|&r| r != i).collect();
        let cols: Vec<usize> = (0..self.cols()).filter(|&c| c != j).collect();
        self.submatrix(&rows, &cols)
    }
}

fn check_same_dims(a: &Matrix, b: &Matrix, op: &str) -> Result<(), StatsError> {
    if a.shape() != b.shape() {
        return Err(StatsError::shape(format!(
            "{}: matrices must have same dimensions, got {}×{} and {}×{}",
            op,
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t[(2, 1)], 6.0);
    }

    #[test]
    fn test_scale_leaves_input_untouched() {
        let a = m(&[&[1.0, -2.0]]);
        let b = a.scale(3.0);
        assert_eq!(b.row(0), vec![3.0, -6.0]);
        assert_eq!(a.row(0), vec![1.0, -2.0]);
    }

    #[test]
    fn test_sub_shape_error() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0], &[2.0]]);
        assert_eq!(a.sub(&b).unwrap_err().code, codes::SHAPE_ERROR);
    }

    #[test]
    fn test_sub() {
        let a = m(&[&[5.0, 5.0], &[5.0, 5.0]]);
        let b = Matrix::identity(2);
        let d = a.sub(&b).unwrap();
        assert_eq!(d.to_rows(), vec![vec![4.0, 5.0], vec![5.0, 4.0]]);
    }

    #[test]
    fn test_matmul() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let p = a.matmul(&Matrix::identity(2)).unwrap();
        assert_eq!(p, a);
        assert!(a.matmul(&Matrix::zeros(3, 1)).is_err());
    }

    #[test]
    fn test_mat_vec() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.mat_vec(&[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_outer() {
        let o = Matrix::outer(&[1.0, 2.0]);
        assert_eq!(o.to_rows(), vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_submatrix() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let s = a.submatrix(&[0, 2], &[1, 2]).unwrap();
        assert_eq!(s.to_rows(), vec![vec![2.0, 3.0], vec![8.0, 9.0]]);
        assert!(a.submatrix(&[], &[0]).is_err());
        assert!(a.submatrix(&[3], &[0]).is_err());
    }
}
