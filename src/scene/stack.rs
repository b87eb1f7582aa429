//! Matrix stack for hierarchical transforms
//!
//! Every multiply right-multiplies the current matrix, so the last transform
//! applied is the first one a vertex sees. Pushes are scoped by [`StackFrame`],
//! which pops when dropped.

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Vec3};

/// Stack of composed model-view matrices
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::with_capacity(16),
        }
    }

    /// Replace the current matrix (start of a pass or a detached subtree).
    ///
    /// # Panics
    ///
    /// Panics if pushes are still outstanding.
    pub fn load(&mut self, m: Mat4) {
        assert!(
            self.saved.is_empty(),
            "load with {} unbalanced push(es)",
            self.saved.len()
        );
        self.current = m;
    }

    /// Unwind to identity between passes
    pub fn reset(&mut self) {
        self.saved.clear();
        self.current = Mat4::IDENTITY;
    }

    #[inline]
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of outstanding pushes
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Save a copy of the current matrix
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last saved matrix.
    ///
    /// # Panics
    ///
    /// Panics on an empty stack; that is a recursion bug, not a data error.
    pub fn pop(&mut self) {
        self.current = self
            .saved
            .pop()
            .unwrap_or_else(|| panic!("TransformStack::pop on an empty stack"));
    }

    /// Push and return a guard that pops on drop
    pub fn scope(&mut self) -> StackFrame<'_> {
        self.push();
        StackFrame { stack: self }
    }

    pub fn multiply(&mut self, m: Mat4) {
        self.current *= m;
    }

    pub fn multiply_translation(&mut self, v: Vec3) {
        self.multiply(Mat4::from_translation(v));
    }

    pub fn multiply_rotation_x(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_x(degrees.to_radians()));
    }

    pub fn multiply_rotation_y(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    pub fn multiply_rotation_z(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_z(degrees.to_radians()));
    }

    pub fn multiply_scale(&mut self, v: Vec3) {
        self.multiply(Mat4::from_scale(v));
    }
}

/// A pushed frame; pops its stack when dropped
pub struct StackFrame<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for StackFrame<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for StackFrame<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}
