#![forbid(unsafe_code)]

//! The rendering surface contract.
//!
//! A surface is a tree of nodes rooted at [`Surface::root`]. Each node has a
//! [`NodeKind`], an optional text payload, and a [`Style`] of numeric
//! properties. Effects create nodes, attach them under the root, animate
//! their properties, and detach them when done.
//!
//! Node identifiers are generational: once a node is detached its id never
//! resolves again, even if the slot is reused.

use std::fmt;

/// Generational identifier of a surface node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Build an id from its parts. Surfaces call this; effects never should.
    #[inline]
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.index, self.generation)
    }
}

/// What a node is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Groups children; draws nothing itself.
    Container,
    /// Draws its text payload.
    Text,
    /// A single transient glyph owned by an emitter.
    Particle,
}

/// Animatable numeric style properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Absolute x position.
    Left,
    /// Absolute y position.
    Top,
    /// Horizontal offset added to `Left`.
    TranslateX,
    /// Vertical offset added to `Top`.
    TranslateY,
    /// Uniform scale factor.
    Scale,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Rotation in degrees.
    Rotate,
    /// Width.
    Width,
    /// Height.
    Height,
}

impl Property {
    /// Every property, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Left,
        Self::Top,
        Self::TranslateX,
        Self::TranslateY,
        Self::Scale,
        Self::Opacity,
        Self::Rotate,
        Self::Width,
        Self::Height,
    ];
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// From `0xRRGGBB`.
    #[inline]
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// As `0xRRGGBB`.
    #[inline]
    #[must_use]
    pub const fn to_hex(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Numeric style of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub left: f32,
    pub top: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub rotate: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            opacity: 1.0,
            rotate: 0.0,
            width: 0.0,
            height: 0.0,
            color: Rgb(0xff, 0xff, 0xff),
        }
    }
}

impl Style {
    /// Read one property.
    #[must_use]
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Left => self.left,
            Property::Top => self.top,
            Property::TranslateX => self.translate_x,
            Property::TranslateY => self.translate_y,
            Property::Scale => self.scale,
            Property::Opacity => self.opacity,
            Property::Rotate => self.rotate,
            Property::Width => self.width,
            Property::Height => self.height,
        }
    }

    /// Write one property. Opacity is clamped to `[0, 1]`.
    pub fn set(&mut self, property: Property, value: f32) {
        let slot = match property {
            Property::Left => &mut self.left,
            Property::Top => &mut self.top,
            Property::TranslateX => &mut self.translate_x,
            Property::TranslateY => &mut self.translate_y,
            Property::Scale => &mut self.scale,
            Property::Opacity => {
                self.opacity = value.clamp(0.0, 1.0);
                return;
            }
            Property::Rotate => &mut self.rotate,
            Property::Width => &mut self.width,
            Property::Height => &mut self.height,
        };
        *slot = value;
    }

    /// Effective position: `left + translate_x`, `top + translate_y`.
    #[inline]
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.left + self.translate_x, self.top + self.translate_y)
    }
}

/// A tree of styled nodes that effects draw into.
///
/// All mutators return `false` (and do nothing) when the node id no longer
/// resolves. Effects rely on this: writing to a node that someone else
/// detached is harmless.
pub trait Surface {
    /// The root node. Never detached.
    fn root(&self) -> NodeId;

    /// Create a detached node of `kind` with default style and no text.
    fn create_node(&mut self, kind: NodeKind) -> NodeId;

    /// Append `child` to `parent`'s children, moving it if it already has a
    /// parent.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool;

    /// Remove `node` and its whole subtree. Their ids stop resolving.
    fn detach(&mut self, node: NodeId) -> bool;

    /// Whether `node` still resolves.
    fn contains(&self, node: NodeId) -> bool;

    /// Kind of `node`.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Children of `node` in attach order (empty if it does not resolve).
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Text payload of `node`.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Replace the text payload of `node`.
    fn set_text(&mut self, node: NodeId, text: &str) -> bool;

    /// Full style of `node`.
    fn style(&self, node: NodeId) -> Option<Style>;

    /// Read a single property.
    fn property(&self, node: NodeId, property: Property) -> Option<f32> {
        self.style(node).map(|style| style.get(property))
    }

    /// Write a single property.
    fn set_property(&mut self, node: NodeId, property: Property, value: f32) -> bool;

    /// Set the foreground color.
    fn set_color(&mut self, node: NodeId, color: Rgb) -> bool;

    /// Number of live nodes, root included.
    fn node_count(&self) -> usize;
}
