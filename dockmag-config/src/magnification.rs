use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Magnification {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument), default = Self::default().rise)]
    pub rise: FloatOrInt<0, 1>,
    #[knuffel(child, unwrap(argument), default = Self::default().magnify)]
    pub magnify: FloatOrInt<0, 1>,
    #[knuffel(child, unwrap(argument), default = Self::default().spread)]
    pub spread: FloatOrInt<0, 1>,
    #[knuffel(child, unwrap(argument), default = Self::default().fps)]
    pub fps: FloatOrInt<0, 4>,
}

impl Default for Magnification {
    fn default() -> Self {
        Self {
            off: false,
            rise: FloatOrInt(0.25),
            magnify: FloatOrInt(0.5),
            spread: FloatOrInt(0.5),
            fps: FloatOrInt(0.),
        }
    }
}

impl Magnification {
    /// Whether all effect coefficients are zero, making magnification a no-op.
    pub fn is_inert(&self) -> bool {
        self.rise.0 + self.magnify.0 + self.spread.0 == 0.
    }
}
