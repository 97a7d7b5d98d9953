//! Field checks applied to untrusted manifest and preference values.

/// A single rule over one manifest or preference field.
///
/// Implementors are unit structs such as the theme id and stylesheet path
/// checks; sanitizers run them and decide whether a failure drops the field
/// or the whole catalog entry.
pub trait Validator<T: ?Sized> {
    type Error;

    /// `Ok(())` when `input` may enter the catalog as is
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}
