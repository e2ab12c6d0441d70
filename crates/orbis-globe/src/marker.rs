//! A geo-located beacon: a light beam rising from the surface, a dot on
//! top, and an invisible hit volume around both.
//!
//! The marker stores only two flags, `hovered` and `selected`. Its visual
//! state is derived from them, with Selected taking precedence.

use glam::Vec3;
use orbis_camera::Capsule;
use orbis_config::MarkerConfig;
use orbis_geo::{GeoCoordinate, SurfacePlacement, project};

use crate::collab::{Category, Item, ItemId};

/// Derived visual state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerState {
    Idle,
    Hovered,
    Selected,
}

impl MarkerState {
    fn index(self) -> usize {
        match self {
            MarkerState::Idle => 0,
            MarkerState::Hovered => 1,
            MarkerState::Selected => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerEvent {
    PointerEnter,
    PointerLeave,
    Select,
    Deselect,
}

/// Expanding ring drawn under a selected marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    /// Position within the current period, in `[0, 1)`.
    pub phase: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// Everything the renderer needs to draw one marker this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerVisual {
    /// Beam breathing factor along its axis.
    pub scale: f32,
    pub beam_height: f32,
    pub beam_width: f32,
    pub beam_opacity: f32,
    pub glow_opacity: f32,
    pub dot_size: f32,
    /// Height of the dot center above the base, including its float.
    pub dot_height: f32,
    pub base_opacity: f32,
    /// Only present while selected.
    pub pulse: Option<Pulse>,
}

/// Marker dimensions shared by all markers.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub surface_offset: f32,
    /// Beam height per state (idle, hovered, selected).
    pub beam_height: [f32; 3],
    pub beam_width: [f32; 3],
    pub beam_opacity: [f32; 3],
    pub dot_size: [f32; 3],
    pub glow_opacity: [f32; 3],
    pub glow_wobble: f32,
    pub breathe_amplitude: f32,
    pub float_amplitude: f32,
    pub base_radius: f32,
    pub hit_radius: f32,
    pub hit_padding: f32,
    pub pulse_period: f32,
    pub pulse_max_radius: f32,
    pub instruments_color: Vec3,
    pub radio_color: Vec3,
}

impl From<&MarkerConfig> for MarkerStyle {
    fn from(c: &MarkerConfig) -> Self {
        Self {
            surface_offset: c.surface_offset,
            beam_height: [
                c.beam_height,
                c.beam_height * c.hover_beam_scale,
                c.selected_beam_height,
            ],
            beam_width: c.beam_width,
            beam_opacity: c.beam_opacity,
            dot_size: c.dot_size,
            glow_opacity: c.glow_opacity,
            glow_wobble: c.glow_wobble,
            breathe_amplitude: c.breathe_amplitude,
            float_amplitude: c.float_amplitude,
            base_radius: c.base_radius,
            hit_radius: c.hit_radius,
            hit_padding: c.hit_padding,
            pulse_period: c.pulse_period.max(f32::EPSILON),
            pulse_max_radius: c.pulse_max_radius,
            instruments_color: Vec3::from_array(c.instruments_color),
            radio_color: Vec3::from_array(c.radio_color),
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from(&MarkerConfig::default())
    }
}

impl MarkerStyle {
    pub fn color(&self, category: Category) -> Vec3 {
        match category {
            Category::Instruments => self.instruments_color,
            Category::Radio => self.radio_color,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    id: ItemId,
    category: Category,
    coordinate: GeoCoordinate,
    placement: SurfacePlacement,
    hovered: bool,
    selected: bool,
}

impl Marker {
    /// Place a marker for `item` on a globe of `radius`.
    pub fn new(item: &Item, radius: f32, style: &MarkerStyle) -> Self {
        Self {
            id: item.id.clone(),
            category: item.category,
            coordinate: item.coordinate,
            placement: project(item.coordinate, radius, style.surface_offset),
            hovered: false,
            selected: false,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    /// Placement in the globe's local frame.
    pub fn placement(&self) -> &SurfacePlacement {
        &self.placement
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn state(&self) -> MarkerState {
        if self.selected {
            MarkerState::Selected
        } else if self.hovered {
            MarkerState::Hovered
        } else {
            MarkerState::Idle
        }
    }

    /// Apply an event. Returns whether the derived state changed.
    pub fn apply(&mut self, event: MarkerEvent) -> bool {
        let before = self.state();
        match event {
            MarkerEvent::PointerEnter => self.hovered = true,
            MarkerEvent::PointerLeave => self.hovered = false,
            MarkerEvent::Select => self.selected = true,
            MarkerEvent::Deselect => self.selected = false,
        }
        before != self.state()
    }

    /// Animated visual at `elapsed` seconds.
    pub fn visual(&self, style: &MarkerStyle, elapsed: f32) -> MarkerVisual {
        let state = self.state();
        let i = state.index();
        let wobble = (elapsed * 1.5).sin();
        let beam_height = style.beam_height[i];

        let pulse = (state == MarkerState::Selected).then(|| {
            let phase = elapsed.rem_euclid(style.pulse_period) / style.pulse_period;
            Pulse {
                phase,
                radius: style.pulse_max_radius * phase,
                opacity: 1.0 - phase,
            }
        });

        MarkerVisual {
            scale: 1.0 + (elapsed * 2.0).sin() * style.breathe_amplitude,
            beam_height,
            beam_width: style.beam_width[i],
            beam_opacity: style.beam_opacity[i],
            glow_opacity: style.glow_opacity[i] + wobble * style.glow_wobble,
            dot_size: style.dot_size[i],
            dot_height: beam_height + wobble * style.float_amplitude,
            base_opacity: if state == MarkerState::Selected { 0.8 } else { 0.5 },
            pulse,
        }
    }

    /// Hit volume in the globe's local frame: a capsule from the base along
    /// the normal, padded past the beam top.
    pub fn hit_capsule(&self, style: &MarkerStyle) -> Capsule {
        let height = style.beam_height[self.state().index()] + style.hit_padding;
        Capsule {
            start: self.placement.position,
            end: self.placement.position + self.placement.normal * height,
            radius: style.hit_radius,
        }
    }
}
