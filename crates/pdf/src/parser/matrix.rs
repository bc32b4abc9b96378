use crate::types::Point;

/// A PDF affine transform `[a, b, c, d, e, f]`.
///
/// Points are row vectors: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f32; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translation(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Build a matrix from six content-stream operands.
    pub fn from_operands(vals: &[f32]) -> Option<Self> {
        match vals {
            [a, b, c, d, e, f] => Some(Matrix([*a, *b, *c, *d, *e, *f])),
            _ => None,
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    pub fn transform(&self, x: f32, y: f32) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * x + c * y + e, b * x + d * y + f)
    }

    /// Length of the transformed unit y vector `(c, d)`, used for effective
    /// font size. Differs from `sqrt(b^2 + d^2)` once the matrix is skewed.
    pub fn vertical_scale(&self) -> f32 {
        self.0[2].hypot(self.0[3])
    }

    /// Horizontal scale factor `sqrt(a^2 + b^2)`, used for glyph widths.
    pub fn horizontal_scale(&self) -> f32 {
        self.0[0].hypot(self.0[1])
    }

    pub fn tx(&self) -> f32 {
        self.0[4]
    }

    pub fn ty(&self) -> f32 {
        self.0[5]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

/// Graphics-state stack tracking only the CTM (`q`, `Q`, `cm`).
#[derive(Debug, Clone, Default)]
pub struct CtmStack {
    current: Matrix,
    saved: Vec<Matrix>,
}

impl CtmStack {
    pub fn ctm(&self) -> Matrix {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced `Q` operators are ignored.
    pub fn restore(&mut self) {
        if let Some(m) = self.saved.pop() {
            self.current = m;
        }
    }

    pub fn concat(&mut self, m: Matrix) {
        self.current = m.multiply(&self.current);
    }
}
