use std::ops::Mul;

/// Width and height of an element, in logical pixels when `T = f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl Size<f32> {
    pub const ZERO: Self = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Area covered by the element.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

impl<T> From<(T, T)> for Size<T> {
    fn from((width, height): (T, T)) -> Self {
        Size { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let size = Size::new(100.0f32, 50.0) * 2.0;
        assert_eq!(size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_cast() {
        let size: Size<f64> = Size::new(3.0f32, 4.0).cast();
        assert_eq!(size.width, 3.0);
        assert_eq!(size.height, 4.0);
    }

    #[test]
    fn test_empty() {
        assert!(Size::<f32>::ZERO.is_empty());
        assert!(Size::new(10.0f32, 0.0).is_empty());
        assert!(!Size::new(10.0f32, 1.0).is_empty());
        assert_eq!(Size::new(10.0f32, 2.0).area(), 20.0);
    }
}
