// q_shared.rs — foundational types and functions shared by the game and its host

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

/// World up. Gravity pulls along the negative of this.
pub const VEC3_UP: Vec3 = [0.0, 0.0, 1.0];

// angle indexes
pub const PITCH: usize = 0; // up / down
pub const YAW: usize = 1; // left / right
pub const ROLL: usize = 2; // fall over

// ============================================================
// Contents and masks
// ============================================================

pub const CONTENTS_SOLID: i32 = 1;
pub const CONTENTS_WINDOW: i32 = 2;
pub const CONTENTS_PLAYERCLIP: i32 = 0x10000;
pub const CONTENTS_MONSTER: i32 = 0x2000000;

/// World geometry only: the grapple never hooks onto actors.
pub const MASK_SOLID: i32 = CONTENTS_SOLID | CONTENTS_WINDOW;
pub const MASK_PLAYERSOLID: i32 =
    CONTENTS_SOLID | CONTENTS_PLAYERCLIP | CONTENTS_WINDOW | CONTENTS_MONSTER;

/// Entity index reported by traces that hit the world.
pub const WORLD_ENTITY: i32 = 0;

// ============================================================
// Plane
// ============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CPlane {
    pub normal: Vec3,
    pub dist: f32,
}

impl CPlane {
    pub fn from_normal(normal: Vec3, dist: f32) -> Self {
        Self { normal, dist }
    }
}

// ============================================================
// Surface
// ============================================================

/// Material of the surface a trace stopped on. The host uses the name to
/// pick impact decals and sounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSurface {
    pub name: String,
    pub flags: i32,
    pub value: i32,
}

// ============================================================
// Trace
// ============================================================

#[derive(Debug, Clone)]
pub struct Trace {
    pub allsolid: bool,
    pub startsolid: bool,
    /// 1.0 = didn't hit anything
    pub fraction: f32,
    pub endpos: Vec3,
    /// surface normal at impact
    pub plane: CPlane,
    pub surface: Option<CSurface>,
    pub contents: i32,
    /// -1 when nothing with a physical body was hit
    pub ent_index: i32,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            allsolid: false,
            startsolid: false,
            fraction: 1.0,
            endpos: [0.0; 3],
            plane: CPlane::default(),
            surface: None,
            contents: 0,
            ent_index: -1,
        }
    }
}

impl Trace {
    /// A trace that travelled all the way to `end`.
    pub fn no_hit(end: &Vec3) -> Self {
        Self {
            endpos: *end,
            ..Default::default()
        }
    }

    /// A trace that stopped against world geometry.
    pub fn world_hit(fraction: f32, endpos: Vec3, normal: Vec3) -> Self {
        Self {
            fraction,
            endpos,
            plane: CPlane::from_normal(normal, dot_product(&endpos, &normal)),
            surface: Some(CSurface::default()),
            contents: CONTENTS_SOLID,
            ent_index: WORLD_ENTITY,
            ..Default::default()
        }
    }

    pub fn hit(&self) -> bool {
        self.fraction < 1.0 || self.startsolid
    }

    /// True when the trace stopped on something with a physical body.
    pub fn has_body(&self) -> bool {
        self.ent_index >= 0
    }
}

// ============================================================
// Button bits
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const ATTACK  = 1;
        const USE     = 2;
        const ATTACK2 = 4;
        const ANY     = 128;
    }
}

pub const BUTTON_ATTACK: Buttons = Buttons::ATTACK;
pub const BUTTON_ATTACK2: Buttons = Buttons::ATTACK2;

// ============================================================
// Usercmd
// ============================================================

/// One tick of player input as sampled by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserCmd {
    pub buttons: Buttons,
    /// view angles, degrees
    pub angles: Vec3,
}

// ============================================================
// Sound channels / attenuation
// ============================================================

pub const CHAN_AUTO: i32 = 0;
pub const CHAN_WEAPON: i32 = 1;
pub const CHAN_VOICE: i32 = 2;
pub const CHAN_ITEM: i32 = 3;
pub const CHAN_BODY: i32 = 4;

pub const ATTN_NONE: f32 = 0.0;
pub const ATTN_NORM: f32 = 1.0;
pub const ATTN_IDLE: f32 = 2.0;
pub const ATTN_STATIC: f32 = 3.0;

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_ZERO: i32 = 0;
/// replicated to every client
pub const CVAR_SERVERINFO: i32 = 4;

// ============================================================
// MATHLIB: vector operations
// ============================================================

#[inline]
pub fn dot_product(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn vector_add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// veca + scale * vecb
#[inline]
pub fn vector_ma(veca: &Vec3, scale: f32, vecb: &Vec3) -> Vec3 {
    [
        veca[0] + scale * vecb[0],
        veca[1] + scale * vecb[1],
        veca[2] + scale * vecb[2],
    ]
}

#[inline]
pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

pub fn vector_length(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn vector_distance(a: &Vec3, b: &Vec3) -> f32 {
    vector_length(&vector_subtract(a, b))
}

/// Normalize in place, returns original length.
pub fn vector_normalize(v: &mut Vec3) -> f32 {
    let length = vector_length(v);
    if length != 0.0 {
        let ilength = 1.0 / length;
        v[0] *= ilength;
        v[1] *= ilength;
        v[2] *= ilength;
    }
    length
}

pub fn vector_compare(v1: &Vec3, v2: &Vec3) -> bool {
    v1[0] == v2[0] && v1[1] == v2[1] && v1[2] == v2[2]
}

/// Within `epsilon` of zero on every axis.
pub fn vector_is_nearly_zero(v: &Vec3, epsilon: f32) -> bool {
    v.iter().all(|c| c.abs() <= epsilon)
}

pub fn cross_product(v1: &Vec3, v2: &Vec3) -> Vec3 {
    [
        v1[1] * v2[2] - v1[2] * v2[1],
        v1[2] * v2[0] - v1[0] * v2[2],
        v1[0] * v2[1] - v1[1] * v2[0],
    ]
}

// ============================================================
// Angle functions
// ============================================================

pub fn angle_vectors(
    angles: &Vec3,
    forward: Option<&mut Vec3>,
    right: Option<&mut Vec3>,
    up: Option<&mut Vec3>,
) {
    let (sy, cy) = angles[YAW].to_radians().sin_cos();
    let (sp, cp) = angles[PITCH].to_radians().sin_cos();
    let (sr, cr) = angles[ROLL].to_radians().sin_cos();

    if let Some(fwd) = forward {
        *fwd = [cp * cy, cp * sy, -sp];
    }
    if let Some(r) = right {
        *r = [
            -sr * sp * cy + -cr * -sy,
            -sr * sp * sy + -cr * cy,
            -sr * cp,
        ];
    }
    if let Some(u) = up {
        *u = [
            cr * sp * cy + -sr * -sy,
            cr * sp * sy + -sr * cy,
            cr * cp,
        ];
    }
}

/// Forward vector only; the common case for aiming.
pub fn angle_forward(angles: &Vec3) -> Vec3 {
    let mut forward = [0.0f32; 3];
    angle_vectors(angles, Some(&mut forward), None, None);
    forward
}
