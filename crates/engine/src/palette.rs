//! Palette generation in HSL space.
//!
//! A palette is nine swatches derived from a base color. Each [`NoiseType`]
//! maps to one of two shapes:
//!
//! - **distributed** types (`complementary`, `split`, `triadic`, `contrast`,
//!   `pop`, `sunset`, `random`) place every swatch with their own per-index
//!   formula;
//! - **filtered** types (everything else) jitter the base color by the noise
//!   amount and then reshape the result with a per-type adjustment.
//!
//! [`shape_of`] is an exhaustive match, so a new noise type does not compile
//! until it is given a policy.

use colorfun_types::{Color, Hsl, NoiseAmount, NoiseType, PALETTE_SIZE, Palette, clamp};
use rand::{Rng, RngCore};

/// Hue anchors used by `sunset`, indexed by swatch position.
pub const SUNSET_HUES: [f64; PALETTE_SIZE] = [0.0, 15.0, 30.0, 330.0, 345.0, 280.0, 20.0, 10.0, 350.0];

/// Hue offsets cycled through by `split`.
const SPLIT_POLES: [f64; 3] = [0.0, 150.0, 210.0];

/// Uniform noise source shared by every policy.
pub struct Jitter<'a> {
    rng: &'a mut dyn RngCore,
}

impl<'a> Jitter<'a> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self { rng }
    }

    /// Uniform value in `[-range, range)`.
    pub fn rnd(&mut self, range: f64) -> f64 {
        (self.unit() * 2.0 - 1.0) * range
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Inputs shared by every swatch of one palette.
#[derive(Clone, Copy, Debug)]
pub struct SwatchContext {
    pub base: Hsl,
    pub noise: f64,
}

/// Places swatch `index` directly.
pub type DistributionPolicy = fn(&mut Jitter<'_>, &SwatchContext, usize) -> Hsl;

/// Reshapes an already-jittered swatch.
pub type FilterPolicy = fn(&mut Jitter<'_>, Hsl, &SwatchContext) -> Hsl;

#[derive(Clone, Copy)]
pub enum NoiseShape {
    Distributed(DistributionPolicy),
    Filtered(FilterPolicy),
}

pub fn shape_of(noise_type: NoiseType) -> NoiseShape {
    use NoiseShape::{Distributed, Filtered};
    match noise_type {
        NoiseType::Complementary => Distributed(complementary),
        NoiseType::Split => Distributed(split),
        NoiseType::Triadic => Distributed(triadic),
        NoiseType::Contrast => Distributed(contrast),
        NoiseType::Pop => Distributed(pop),
        NoiseType::Sunset => Distributed(sunset),
        NoiseType::Random => Distributed(random),
        NoiseType::Pastel => Filtered(pastel),
        NoiseType::Neon => Filtered(neon),
        NoiseType::Earthy => Filtered(earthy),
        NoiseType::Muted => Filtered(muted),
        NoiseType::Dust => Filtered(dust),
        NoiseType::Deep => Filtered(deep),
        NoiseType::Bright => Filtered(bright),
        NoiseType::Mono => Filtered(mono),
        NoiseType::Analogous => Filtered(analogous),
        NoiseType::Cold => Filtered(cold),
        NoiseType::Warm => Filtered(warm),
        NoiseType::Ice => Filtered(ice),
        NoiseType::Shadow => Filtered(shadow),
        NoiseType::Toxic => Filtered(toxic),
        NoiseType::Vintage => Filtered(vintage),
    }
}

/// Generate a palette with the thread-local random source.
pub fn generate_palette(base: Color, noise: NoiseAmount, noise_type: NoiseType) -> Palette {
    generate_palette_with(&mut rand::thread_rng(), base, noise, noise_type)
}

/// Generate a palette drawing randomness from `rng`.
pub fn generate_palette_with<R: RngCore + ?Sized>(rng: &mut R, base: Color, noise: NoiseAmount, noise_type: NoiseType) -> Palette {
    let swatches = generate_hsl_with(rng, base, noise, noise_type);
    Palette::new(swatches.map(|hsl| hsl.to_color()))
}

/// Generate the nine HSL swatches before conversion back to sRGB.
pub fn generate_hsl_with<R: RngCore + ?Sized>(
    rng: &mut R,
    base: Color,
    noise: NoiseAmount,
    noise_type: NoiseType,
) -> [Hsl; PALETTE_SIZE] {
    let mut adapter = DynRng(rng);
    let mut jitter = Jitter::new(&mut adapter);
    let context = SwatchContext {
        base: base.to_hsl(),
        noise: noise.as_f64(),
    };

    match shape_of(noise_type) {
        NoiseShape::Distributed(policy) => std::array::from_fn(|index| policy(&mut jitter, &context, index)),
        NoiseShape::Filtered(policy) => std::array::from_fn(|_| {
            let jittered = jitter_base(&mut jitter, &context);
            policy(&mut jitter, jittered, &context)
        }),
    }
}

/// Forwards to a possibly unsized generator so it can sit behind `&mut dyn RngCore`.
struct DynRng<'a, R: RngCore + ?Sized>(&'a mut R);

impl<R: RngCore + ?Sized> RngCore for DynRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

/// Common first step of the filtered shape.
pub(crate) fn jitter_base(jitter: &mut Jitter<'_>, context: &SwatchContext) -> Hsl {
    let SwatchContext { base, noise } = *context;
    let h = base.h + jitter.rnd(noise * 1.2);
    let s = clamp(base.s + jitter.rnd(noise * 0.6), 0.0, 100.0);
    let l = clamp(base.l + jitter.rnd(noise * 0.6), 0.0, 100.0);
    Hsl::new(h, s, l)
}

// ---- distributed policies ----

fn complementary(jitter: &mut Jitter<'_>, context: &SwatchContext, index: usize) -> Hsl {
    let SwatchContext { base, noise } = *context;
    let anchor = if index >= 5 { base.h + 180.0 } else { base.h };
    Hsl::new(
        anchor + jitter.rnd(noise * 0.4),
        clamp(base.s + jitter.rnd(noise * 0.5), 30.0, 95.0),
        clamp(base.l + jitter.rnd(noise * 0.5), 25.0, 85.0),
    )
}

fn split(jitter: &mut Jitter<'_>, context: &SwatchContext, index: usize) -> Hsl {
    let SwatchContext { base, noise } = *context;
    Hsl::new(
        base.h + SPLIT_POLES[index % 3] + jitter.rnd(noise * 0.35),
        clamp(base.s + jitter.rnd(noise * 0.4), 30.0, 90.0),
        clamp(base.l + jitter.rnd(noise * 0.4), 25.0, 82.0),
    )
}

fn triadic(jitter: &mut Jitter<'_>, context: &SwatchContext, index: usize) -> Hsl {
    let SwatchContext { base, noise } = *context;
    Hsl::new(
        base.h + (index % 3) as f64 * 120.0 + jitter.rnd(noise * 0.3),
        clamp(base.s + jitter.rnd(noise * 0.4), 35.0, 90.0),
        clamp(base.l + jitter.rnd(noise * 0.4), 28.0, 80.0),
    )
}

fn contrast(jitter: &mut Jitter<'_>, context: &SwatchContext, index: usize) -> Hsl {
    let SwatchContext { base, noise } = *context;
    let h = base.h + jitter.rnd(noise * 0.5);
    let s = clamp(base.s + jitter.rnd(noise * 0.3), 20.0, 85.0);
    let l = if index % 2 == 0 {
        clamp(85.0 + jitter.rnd(10.0), 75.0, 96.0)
    } else {
        clamp(18.0 + jitter.rnd(12.0), 8.0, 35.0)
    };
    Hsl::new(h, s, l)
}

fn pop(jitter: &mut Jitter<'_>, context: &SwatchContext, index: usize) -> Hsl {
    let SwatchContext { base, noise } = *context;
    let h = base.h + jitter.rnd(noise * 1.2);
    let (s, l) = if index % 2 == 0 {
        (clamp(base.s * 1.25 + jitter.rnd(10.0), 70.0, 100.0), clamp(base.l, 45.0, 65.0))
    } else {
        (
            clamp(base.s * 0.55 + jitter.rnd(10.0), 15.0, 55.0),
            clamp(base.l * 1.15 + jitter.rnd(8.0), 60.0, 92.0),
        )
    };
    Hsl::new(h, s, l)
}

fn sunset(jitter: &mut Jitter<'_>, _context: &SwatchContext, index: usize) -> Hsl {
    Hsl::new(
        SUNSET_HUES[index % PALETTE_SIZE] + jitter.rnd(15.0),
        clamp(75.0 + jitter.rnd(20.0), 55.0, 100.0),
        clamp(55.0 + jitter.rnd(20.0), 35.0, 75.0),
    )
}

fn random(jitter: &mut Jitter<'_>, _context: &SwatchContext, _index: usize) -> Hsl {
    Hsl::new(jitter.unit() * 360.0, jitter.unit() * 100.0, jitter.unit() * 100.0)
}

// ---- filtered policies ----

fn pastel(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 0.65, 18.0, 65.0), clamp(hsl.l * 1.10, 55.0, 92.0))
}

fn neon(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 1.25, 70.0, 100.0), clamp(hsl.l, 45.0, 65.0))
}

fn earthy(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h + 15.0, clamp(hsl.s * 0.75, 20.0, 70.0), clamp(hsl.l * 0.95, 25.0, 70.0))
}

fn muted(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 0.35, 5.0, 38.0), clamp(hsl.l, 30.0, 75.0))
}

fn dust(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 0.20, 3.0, 22.0), clamp(hsl.l * 1.05, 55.0, 88.0))
}

fn deep(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 1.05, 25.0, 90.0), clamp(hsl.l * 0.45, 5.0, 38.0))
}

fn bright(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h, clamp(hsl.s * 1.1, 45.0, 95.0), clamp(hsl.l * 1.2, 55.0, 82.0))
}

fn mono(jitter: &mut Jitter<'_>, hsl: Hsl, context: &SwatchContext) -> Hsl {
    // Hue barely leaves the base; only saturation and lightness spread.
    Hsl::new(
        context.base.h + jitter.rnd(8.0),
        clamp(hsl.s * 0.9, 10.0, 90.0),
        clamp(hsl.l, 15.0, 90.0),
    )
}

fn analogous(jitter: &mut Jitter<'_>, hsl: Hsl, context: &SwatchContext) -> Hsl {
    Hsl::new(
        context.base.h + jitter.rnd(25.0),
        clamp(hsl.s, 30.0, 90.0),
        clamp(hsl.l, 25.0, 80.0),
    )
}

fn cold(jitter: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(180.0 + jitter.unit() * 100.0, clamp(hsl.s * 0.9, 30.0, 90.0), clamp(hsl.l, 25.0, 80.0))
}

fn warm(jitter: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(jitter.unit() * 90.0 - 30.0, clamp(hsl.s, 40.0, 95.0), clamp(hsl.l, 30.0, 78.0))
}

fn ice(jitter: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(185.0 + jitter.rnd(25.0), clamp(hsl.s * 0.5, 10.0, 45.0), clamp(hsl.l * 1.3, 72.0, 97.0))
}

fn shadow(jitter: &mut Jitter<'_>, hsl: Hsl, context: &SwatchContext) -> Hsl {
    Hsl::new(
        hsl.h,
        clamp(hsl.s * 1.05, 15.0, 85.0),
        clamp(context.base.l * 0.5 - jitter.unit() * 15.0, 4.0, 40.0),
    )
}

fn toxic(jitter: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(70.0 + jitter.rnd(40.0), clamp(hsl.s * 1.3, 65.0, 100.0), clamp(hsl.l, 40.0, 72.0))
}

fn vintage(_: &mut Jitter<'_>, hsl: Hsl, _: &SwatchContext) -> Hsl {
    Hsl::new(hsl.h + 20.0, clamp(hsl.s * 0.55, 10.0, 50.0), clamp(hsl.l * 0.85, 28.0, 72.0))
}
