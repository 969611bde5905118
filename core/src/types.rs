/// Single coordinate axis used for surface width, height, and brush radii.
pub type Px = u16;

/// Count type used for erased-unit and total-unit counts.
pub type PxCount = u32;

/// Two-dimensional surface size `(width, height)`.
pub type Size2 = (Px, Px);

/// Pointer or touch position in surface-local units. Positions may fall
/// outside the surface; erasure clamps to the surface bounds.
pub type Point = (f64, f64);

pub const fn mult(a: Px, b: Px) -> PxCount {
    let a = a as PxCount;
    let b = b as PxCount;
    a.saturating_mul(b)
}
