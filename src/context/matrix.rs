use crate::foundation::math::Mat4;

/// Maximum depth of each matrix stack, counting the current matrix.
pub const MATRIX_STACK_DEPTH: usize = 32;

/// Which stack matrix operations apply to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMode {
    /// Object to eye transform.
    #[default]
    ModelView,
    /// Eye to clip transform.
    Projection,
}

/// A bounded stack whose top is the current matrix.
#[derive(Clone, Debug)]
pub(crate) struct MatrixStack {
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }
}

impl MatrixStack {
    pub(crate) fn top(&self) -> &Mat4 {
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Panics when the stack is full.
    pub(crate) fn push(&mut self) {
        assert!(
            self.stack.len() < MATRIX_STACK_DEPTH,
            "matrix stack overflow (depth {MATRIX_STACK_DEPTH})"
        );
        let top = *self.top();
        self.stack.push(top);
    }

    /// Panics when only the base matrix is left.
    pub(crate) fn pop(&mut self) {
        assert!(self.stack.len() > 1, "matrix stack underflow");
        self.stack.pop();
    }

    pub(crate) fn load(&mut self, m: Mat4) {
        *self.top_mut() = m;
    }

    /// Post-multiply the current matrix: `top = top * m`.
    pub(crate) fn mult(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top = *top * m;
    }
}
