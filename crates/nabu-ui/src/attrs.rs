//! Typed attribute access.
//!
//! Markup attributes are raw strings. [`AttributeResolver`] coerces them to
//! the types builders need and never fails: a missing or malformed value
//! yields the caller's default. Vector and color parses are memoized in
//! bounded caches that stop growing once full.

use std::collections::HashMap;

use log::warn;

use nabu_engine::coords::{Vec2, Vec3, Vec4};
use nabu_engine::host::{
    Axis, ContentType, Corner, GridConstraint, RenderMode, SliderDirection, TextAlign, TextAnchor,
};
use nabu_engine::paint::Color;
use nabu_markup::MarkupNode;

/// Upper bound on entries per cache, seeds included.
pub const MAX_CACHE_SIZE: usize = 100;

// ── Free parsers ──────────────────────────────────────────────────────────

pub fn parse_bool(raw: &str) -> Option<bool> {
    const TABLE: &[(&str, bool)] = &[
        ("true", true), ("1", true), ("yes", true), ("on", true),
        ("false", false), ("0", false), ("no", false), ("off", false),
    ];
    let raw = raw.trim();
    TABLE.iter().find(|(k, _)| k.eq_ignore_ascii_case(raw)).map(|(_, v)| *v)
}

fn parse_components(raw: &str) -> Option<Vec<f32>> {
    raw.split(',').map(|part| part.trim().parse::<f32>().ok()).collect()
}

pub fn parse_vec2(raw: &str) -> Option<Vec2> {
    match parse_components(raw)?.as_slice() {
        [x, y] => Some(Vec2::new(*x, *y)),
        _ => None,
    }
}

/// Three components, or two with `z = 1`.
pub fn parse_vec3(raw: &str) -> Option<Vec3> {
    match parse_components(raw)?.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        [x, y] => Some(Vec3::new(*x, *y, 1.0)),
        _ => None,
    }
}

pub fn parse_vec4(raw: &str) -> Option<Vec4> {
    match parse_components(raw)?.as_slice() {
        [x, y, z, w] => Some(Vec4::new(*x, *y, *z, *w)),
        _ => None,
    }
}

/// `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let [r, g, b, a] = match hex.len() {
        3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [byte(0)?, byte(2)?, byte(4)?, 255],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

/// `r,g,b` or `r,g,b,a` with channels on the 0–255 scale.
pub fn parse_csv_color(raw: &str) -> Option<Color> {
    let c = parse_components(raw)?;
    let ch = |v: f32| v / 255.0;
    match c.as_slice() {
        [r, g, b] => Some(Color::rgb(ch(*r), ch(*g), ch(*b))),
        [r, g, b, a] => Some(Color::rgba(ch(*r), ch(*g), ch(*b), ch(*a))),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    const NAMES: &[(&str, Color)] = &[
        ("white",   Color::WHITE),
        ("black",   Color::BLACK),
        ("red",     Color::RED),
        ("green",   Color::GREEN),
        ("blue",    Color::BLUE),
        ("yellow",  Color::YELLOW),
        ("cyan",    Color::CYAN),
        ("magenta", Color::MAGENTA),
        ("gray",    Color::GRAY),
        ("grey",    Color::GRAY),
        ("clear",   Color::CLEAR),
    ];
    NAMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, c)| *c)
}

// ── Enum tables ───────────────────────────────────────────────────────────

/// An enum resolvable from a fixed, case-insensitive name table.
pub trait AttrEnum: Copy + 'static {
    const TYPE_NAME: &'static str;
    const TABLE: &'static [(&'static str, Self)];

    fn from_name(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::TABLE.iter().find(|(n, _)| n.eq_ignore_ascii_case(raw)).map(|(_, v)| *v)
    }
}

impl AttrEnum for TextAlign {
    const TYPE_NAME: &'static str = "text alignment";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("left",         TextAlign::Left),
        ("right",        TextAlign::Right),
        ("center",       TextAlign::Center),
        ("justified",    TextAlign::Justified),
        ("topleft",      TextAlign::TopLeft),
        ("topright",     TextAlign::TopRight),
        ("topcenter",    TextAlign::TopCenter),
        ("bottomleft",   TextAlign::BottomLeft),
        ("bottomright",  TextAlign::BottomRight),
        ("bottomcenter", TextAlign::BottomCenter),
        ("midlineleft",  TextAlign::MidlineLeft),
    ];
}

impl AttrEnum for TextAnchor {
    const TYPE_NAME: &'static str = "anchor";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("upperleft",    TextAnchor::UpperLeft),
        ("uppercenter",  TextAnchor::UpperCenter),
        ("upperright",   TextAnchor::UpperRight),
        ("middleleft",   TextAnchor::MiddleLeft),
        ("middlecenter", TextAnchor::MiddleCenter),
        ("middleright",  TextAnchor::MiddleRight),
        ("lowerleft",    TextAnchor::LowerLeft),
        ("lowercenter",  TextAnchor::LowerCenter),
        ("lowerright",   TextAnchor::LowerRight),
    ];
}

impl AttrEnum for Corner {
    const TYPE_NAME: &'static str = "grid corner";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("upperleft",  Corner::UpperLeft),
        ("upperright", Corner::UpperRight),
        ("lowerleft",  Corner::LowerLeft),
        ("lowerright", Corner::LowerRight),
    ];
}

impl AttrEnum for Axis {
    const TYPE_NAME: &'static str = "axis";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("horizontal", Axis::Horizontal),
        ("vertical",   Axis::Vertical),
    ];
}

impl AttrEnum for GridConstraint {
    const TYPE_NAME: &'static str = "grid constraint";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("flexible",         GridConstraint::Flexible),
        ("fixedcolumncount", GridConstraint::FixedColumnCount),
        ("fixedrowcount",    GridConstraint::FixedRowCount),
    ];
}

impl AttrEnum for RenderMode {
    const TYPE_NAME: &'static str = "render mode";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("overlay", RenderMode::Overlay),
        ("camera",  RenderMode::Camera),
        ("world",   RenderMode::World),
    ];
}

impl AttrEnum for SliderDirection {
    const TYPE_NAME: &'static str = "slider direction";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("lefttoright", SliderDirection::LeftToRight),
        ("righttoleft", SliderDirection::RightToLeft),
        ("bottomtotop", SliderDirection::BottomToTop),
        ("toptobottom", SliderDirection::TopToBottom),
    ];
}

impl AttrEnum for ContentType {
    const TYPE_NAME: &'static str = "content type";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("standard",     ContentType::Standard),
        ("integer",      ContentType::Integer),
        ("decimal",      ContentType::Decimal),
        ("alphanumeric", ContentType::Alphanumeric),
        ("name",         ContentType::Name),
        ("email",        ContentType::Email),
        ("password",     ContentType::Password),
        ("pin",          ContentType::Pin),
    ];
}

// ── BoundedCache ──────────────────────────────────────────────────────────

/// Insert-only map that silently refuses new keys once `MAX_CACHE_SIZE`
/// entries are present.
#[derive(Debug)]
struct BoundedCache<V: Copy + 'static> {
    map: HashMap<String, V>,
    seeds: &'static [(&'static str, V)],
}

impl<V: Copy + 'static> BoundedCache<V> {
    fn seeded(seeds: &'static [(&'static str, V)]) -> Self {
        let mut cache = Self { map: HashMap::with_capacity(MAX_CACHE_SIZE), seeds };
        cache.reset();
        cache
    }

    fn reset(&mut self) {
        self.map.clear();
        for (k, v) in self.seeds {
            self.map.insert((*k).to_string(), *v);
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        self.map.get(key).copied()
    }

    fn insert(&mut self, key: &str, value: V) {
        if self.map.len() < MAX_CACHE_SIZE {
            self.map.insert(key.to_string(), value);
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

const VEC2_SEEDS: &[(&str, Vec2)] = &[
    ("0,0",       Vec2::new(0.0, 0.0)),
    ("1,1",       Vec2::new(1.0, 1.0)),
    ("0.5,0.5",   Vec2::new(0.5, 0.5)),
    ("1920,1080", Vec2::new(1920.0, 1080.0)),
    ("100,100",   Vec2::new(100.0, 100.0)),
    ("1,0",       Vec2::new(1.0, 0.0)),
    ("0,1",       Vec2::new(0.0, 1.0)),
];

const VEC3_SEEDS: &[(&str, Vec3)] = &[
    ("0,0,0",       Vec3::new(0.0, 0.0, 0.0)),
    ("1,1,1",       Vec3::new(1.0, 1.0, 1.0)),
    ("0.5,0.5,0.5", Vec3::new(0.5, 0.5, 0.5)),
    ("1,0,0",       Vec3::new(1.0, 0.0, 0.0)),
    ("0,1,0",       Vec3::new(0.0, 1.0, 0.0)),
    ("0,0,1",       Vec3::new(0.0, 0.0, 1.0)),
];

const VEC4_SEEDS: &[(&str, Vec4)] = &[
    ("0,0,0,0",     Vec4::new(0.0, 0.0, 0.0, 0.0)),
    ("1,1,1,1",     Vec4::new(1.0, 1.0, 1.0, 1.0)),
    ("10,10,10,10", Vec4::new(10.0, 10.0, 10.0, 10.0)),
    ("5,5,5,5",     Vec4::new(5.0, 5.0, 5.0, 5.0)),
];

// Keys are lowercase; lookups lowercase the raw value first.
const COLOR_SEEDS: &[(&str, Color)] = &[
    ("white",   Color::WHITE),
    ("black",   Color::BLACK),
    ("red",     Color::RED),
    ("green",   Color::GREEN),
    ("blue",    Color::BLUE),
    ("yellow",  Color::YELLOW),
    ("cyan",    Color::CYAN),
    ("magenta", Color::MAGENTA),
    ("gray",    Color::GRAY),
    ("grey",    Color::GRAY),
    ("clear",   Color::CLEAR),
    ("#ffffff", Color::WHITE),
    ("#000000", Color::BLACK),
    ("#ff0000", Color::RED),
    ("#00ff00", Color::GREEN),
    ("#0000ff", Color::BLUE),
    ("#ffff00", Color::rgb(1.0, 1.0, 0.0)),
];

// ── CacheStats ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub vec2: usize,
    pub vec3: usize,
    pub vec4: usize,
    pub color: usize,
    pub capacity: usize,
}

// ── AttributeResolver ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AttributeResolver {
    strict: bool,
    vec2: BoundedCache<Vec2>,
    vec3: BoundedCache<Vec3>,
    vec4: BoundedCache<Vec4>,
    color: BoundedCache<Color>,
}

impl AttributeResolver {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            vec2: BoundedCache::seeded(VEC2_SEEDS),
            vec3: BoundedCache::seeded(VEC3_SEEDS),
            vec4: BoundedCache::seeded(VEC4_SEEDS),
            color: BoundedCache::seeded(COLOR_SEEDS),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            vec2: self.vec2.len(),
            vec3: self.vec3.len(),
            vec4: self.vec4.len(),
            color: self.color.len(),
            capacity: MAX_CACHE_SIZE,
        }
    }

    /// Drops everything learned since construction; seed entries remain.
    pub fn clear_caches(&mut self) {
        self.vec2.reset();
        self.vec3.reset();
        self.vec4.reset();
        self.color.reset();
    }

    // ── Cached parsers ────────────────────────────────────────────────────

    pub fn parse_vec2(&mut self, raw: &str) -> Option<Vec2> {
        let key = raw.trim();
        if let Some(v) = self.vec2.get(key) {
            return Some(v);
        }
        let v = parse_vec2(key)?;
        self.vec2.insert(key, v);
        Some(v)
    }

    pub fn parse_vec3(&mut self, raw: &str) -> Option<Vec3> {
        let key = raw.trim();
        if let Some(v) = self.vec3.get(key) {
            return Some(v);
        }
        let v = parse_vec3(key)?;
        // The two-component form is answered but never memoized.
        if key.split(',').count() == 3 {
            self.vec3.insert(key, v);
        }
        Some(v)
    }

    pub fn parse_vec4(&mut self, raw: &str) -> Option<Vec4> {
        let key = raw.trim();
        if let Some(v) = self.vec4.get(key) {
            return Some(v);
        }
        let v = parse_vec4(key)?;
        self.vec4.insert(key, v);
        Some(v)
    }

    /// Named or hex literal from the cache, then html hex, then 0–255 csv.
    /// A result equal to `default` is returned but not cached.
    pub fn parse_color(&mut self, raw: &str, default: Color) -> Option<Color> {
        let key = raw.trim().to_ascii_lowercase();
        if let Some(c) = self.color.get(&key) {
            return Some(c);
        }
        let c = named_color(&key)
            .or_else(|| parse_hex_color(&key))
            .or_else(|| parse_csv_color(&key))?;
        if c != default {
            self.color.insert(&key, c);
        }
        Some(c)
    }

    // ── Node accessors ────────────────────────────────────────────────────

    /// Raw string value, or `default` when absent.
    pub fn string(&self, node: &MarkupNode, key: &str, default: &str) -> String {
        node.attr(key).unwrap_or(default).to_string()
    }

    /// Raw string value, treating an empty attribute as absent.
    pub fn non_empty<'n>(&self, node: &'n MarkupNode, key: &str) -> Option<&'n str> {
        node.attr(key).filter(|v| !v.trim().is_empty())
    }

    pub fn float(&self, node: &MarkupNode, key: &str, default: f32) -> f32 {
        self.coerce(node, key, "number", default, |raw| raw.trim().parse::<f32>().ok())
    }

    pub fn int(&self, node: &MarkupNode, key: &str, default: i32) -> i32 {
        self.coerce(node, key, "integer", default, |raw| raw.trim().parse::<i32>().ok())
    }

    pub fn boolean(&self, node: &MarkupNode, key: &str, default: bool) -> bool {
        self.coerce(node, key, "boolean", default, parse_bool)
    }

    pub fn vec2(&mut self, node: &MarkupNode, key: &str, default: Vec2) -> Vec2 {
        let parsed = node.attr(key).map(|raw| (raw, self.parse_vec2(raw)));
        self.settle(node, key, "2-vector", default, parsed)
    }

    pub fn vec3(&mut self, node: &MarkupNode, key: &str, default: Vec3) -> Vec3 {
        let parsed = node.attr(key).map(|raw| (raw, self.parse_vec3(raw)));
        self.settle(node, key, "3-vector", default, parsed)
    }

    pub fn vec4(&mut self, node: &MarkupNode, key: &str, default: Vec4) -> Vec4 {
        let parsed = node.attr(key).map(|raw| (raw, self.parse_vec4(raw)));
        self.settle(node, key, "4-vector", default, parsed)
    }

    pub fn color(&mut self, node: &MarkupNode, key: &str, default: Color) -> Color {
        let parsed = node.attr(key).map(|raw| (raw, self.parse_color(raw, default)));
        self.settle(node, key, "color", default, parsed)
    }

    pub fn enumeration<T: AttrEnum>(&self, node: &MarkupNode, key: &str, default: T) -> T {
        self.coerce(node, key, T::TYPE_NAME, default, T::from_name)
    }

    /// Generic entry point over every supported attribute type.
    pub fn get<T: FromAttr>(&mut self, node: &MarkupNode, key: &str, default: T) -> T {
        T::from_attr(self, node, key, default)
    }

    fn coerce<T>(
        &self,
        node: &MarkupNode,
        key: &str,
        what: &str,
        default: T,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> T {
        let parsed = node.attr(key).map(|raw| (raw, parse(raw)));
        self.settle(node, key, what, default, parsed)
    }

    fn settle<T>(
        &self,
        node: &MarkupNode,
        key: &str,
        what: &str,
        default: T,
        parsed: Option<(&str, Option<T>)>,
    ) -> T {
        match parsed {
            None => default,
            Some((_, Some(v))) => v,
            Some((raw, None)) => {
                if self.strict {
                    warn!(
                        "<{} name={:?}> attribute '{}': cannot read {:?} as {}; using default",
                        node.tag,
                        node.attr("name").unwrap_or(""),
                        key,
                        raw,
                        what
                    );
                }
                default
            }
        }
    }
}

impl Default for AttributeResolver {
    fn default() -> Self {
        Self::new(false)
    }
}

// ── FromAttr ──────────────────────────────────────────────────────────────

/// Types [`AttributeResolver::get`] can produce.
pub trait FromAttr: Sized {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self;
}

impl FromAttr for String {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.string(node, key, &default)
    }
}

impl FromAttr for f32 {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.float(node, key, default)
    }
}

impl FromAttr for i32 {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.int(node, key, default)
    }
}

impl FromAttr for bool {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.boolean(node, key, default)
    }
}

impl FromAttr for Vec2 {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.vec2(node, key, default)
    }
}

impl FromAttr for Vec3 {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.vec3(node, key, default)
    }
}

impl FromAttr for Vec4 {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.vec4(node, key, default)
    }
}

impl FromAttr for Color {
    fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
        r.color(node, key, default)
    }
}

macro_rules! enum_from_attr {
    ($($ty:ty),* $(,)?) => {
        $(impl FromAttr for $ty {
            fn from_attr(r: &mut AttributeResolver, node: &MarkupNode, key: &str, default: Self) -> Self {
                r.enumeration(node, key, default)
            }
        })*
    };
}

enum_from_attr!(TextAlign, TextAnchor, Corner, Axis, GridConstraint, RenderMode, SliderDirection, ContentType);
