/// Periodic on/off signal for blinking buttons. Holds no business state:
/// the caller says whether blinking is wanted, the tick says whether the
/// highlight is lit right now.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    interval: f32,
    elapsed: f32,
    lit: bool,
}

impl Blink {
    pub fn new(interval: f32) -> Self {
        Self { interval: interval.max(f32::EPSILON), elapsed: 0.0, lit: false }
    }

    pub fn tick(&mut self, dt: f32, active: bool) -> bool {
        if !active {
            self.elapsed = 0.0;
            self.lit = false;
            return false;
        }
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.lit = !self.lit;
        }
        self.lit
    }
}
