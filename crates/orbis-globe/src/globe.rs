//! The globe: idle spin, cloud shells, marker set, material readiness and
//! hover/pick bookkeeping.

use glam::{EulerRot, Mat4, Vec3};
use orbis_camera::{Capsule, Ray, pick_nearest};
use orbis_config::{CloudLayerConfig, GlobeConfig};
use orbis_shading::ShadingState;
use rustc_hash::FxHashSet;

use crate::arena::MarkerArena;
use crate::collab::{Category, CursorHint, CursorSink, ItemCatalog, ItemId, LoadingSink};
use crate::marker::{Marker, MarkerEvent, MarkerStyle, MarkerVisual};

/// Which surface shader the globe uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobeMaterial {
    /// Flat colour plus rim while textures load.
    #[default]
    Placeholder,
    /// Full layered shading.
    Realistic,
}

/// One rotating cloud shell, a child of the globe.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudLayer {
    pub offset: f32,
    pub rotation_rate: f32,
    pub opacity: f32,
    pub tilt: Vec3,
    pub angle: f32,
}

impl From<&CloudLayerConfig> for CloudLayer {
    fn from(c: &CloudLayerConfig) -> Self {
        Self {
            offset: c.offset,
            rotation_rate: c.rotation_rate,
            opacity: c.opacity,
            tilt: Vec3::from_array(c.tilt),
            angle: 0.0,
        }
    }
}

impl CloudLayer {
    /// Transform relative to the globe: the spin adds to the fixed Y tilt.
    pub fn local_matrix(&self, radius: f32) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.tilt.x, self.tilt.y + self.angle, self.tilt.z)
            * Mat4::from_scale(Vec3::splat(radius + self.offset))
    }
}

/// A marker ready to draw, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerDraw {
    /// Marker frame: +Y along the surface normal, origin at the base.
    pub transform: Mat4,
    pub color: Vec3,
    pub dot_color: Vec3,
    pub visual: MarkerVisual,
}

#[derive(Debug)]
pub struct Globe {
    radius: f32,
    rotation_rate: f32,
    rotation: f32,
    clouds: Vec<CloudLayer>,
    atmosphere_scale: f32,
    inner_glow_offset: f32,
    markers: MarkerArena,
    style: MarkerStyle,
    hovered: Option<ItemId>,
    material: GlobeMaterial,
    settle_delay: f32,
    /// Seconds left before the loaded signal, once textures resolve.
    settle_remaining: Option<f32>,
    loaded_reported: bool,
    /// Category and catalog revision of the last marker sync.
    synced: Option<(Category, u64)>,
    draws: Vec<MarkerDraw>,
}

impl Globe {
    pub fn new(config: &GlobeConfig, style: MarkerStyle) -> Self {
        Self {
            radius: config.radius,
            rotation_rate: config.rotation_rate,
            rotation: 0.0,
            clouds: config.cloud_layers.iter().map(CloudLayer::from).collect(),
            atmosphere_scale: config.atmosphere_scale,
            inner_glow_offset: config.inner_glow_offset,
            markers: MarkerArena::new(),
            style,
            hovered: None,
            material: GlobeMaterial::Placeholder,
            settle_delay: config.settle_delay_s.max(0.0),
            settle_remaining: None,
            loaded_reported: false,
            synced: None,
            draws: Vec::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Accumulated spin about +Y, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn material(&self) -> GlobeMaterial {
        self.material
    }

    pub fn clouds(&self) -> &[CloudLayer] {
        &self.clouds
    }

    pub fn markers(&self) -> &MarkerArena {
        &self.markers
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn hovered(&self) -> Option<&ItemId> {
        self.hovered.as_ref()
    }

    /// Spin only; markers and clouds are authored in this frame.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.rotation_matrix() * Mat4::from_scale(Vec3::splat(self.radius))
    }

    pub fn cloud_model(&self, layer: &CloudLayer) -> Mat4 {
        self.rotation_matrix() * layer.local_matrix(self.radius)
    }

    /// The atmosphere shell does not spin with the globe.
    pub fn shell_model(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.radius * self.atmosphere_scale))
    }

    pub fn glow_model(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.radius + self.inner_glow_offset))
    }

    /// Advance animation by `dt` seconds and report loading once settled.
    pub fn update(&mut self, dt: f32, shading: &mut ShadingState, loading: &mut impl LoadingSink) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        shading.advance(dt);
        self.rotation = (self.rotation + dt * self.rotation_rate) % std::f32::consts::TAU;
        for layer in &mut self.clouds {
            layer.angle = (layer.angle + dt * layer.rotation_rate) % std::f32::consts::TAU;
        }

        if let Some(remaining) = &mut self.settle_remaining {
            *remaining -= dt;
            if *remaining <= 0.0 && !self.loaded_reported {
                self.loaded_reported = true;
                self.settle_remaining = None;
                tracing::info!("globe loaded");
                loading.set_globe_loaded(true);
            }
        }
    }

    /// Swap to the realistic material. Only the first call has an effect.
    /// Returns whether the swap happened.
    pub fn textures_resolved(&mut self) -> bool {
        if self.material == GlobeMaterial::Realistic {
            return false;
        }
        self.material = GlobeMaterial::Realistic;
        self.settle_remaining = Some(self.settle_delay);
        tracing::info!(settle_s = self.settle_delay, "globe textures resolved");
        true
    }

    pub fn is_loaded_reported(&self) -> bool {
        self.loaded_reported
    }

    /// Make the marker set match the items of `category`. Markers that stay
    /// visible keep their state.
    ///
    /// Does nothing unless the category or the catalog revision changed
    /// since the last call. Returns whether the markers were rebuilt.
    pub fn sync_markers(&mut self, catalog: &ItemCatalog, category: Category) -> bool {
        let key = (category, catalog.revision());
        if self.synced == Some(key) {
            return false;
        }
        self.synced = Some(key);

        let visible: FxHashSet<&ItemId> = catalog.in_category(category).map(|i| &i.id).collect();
        let removed = self.markers.retain(|id| visible.contains(id));

        let mut created = 0;
        for item in catalog.in_category(category) {
            if !self.markers.contains(&item.id) {
                self.markers.insert(Marker::new(item, self.radius, &self.style));
                created += 1;
            }
        }

        if let Some(id) = &self.hovered
            && !self.markers.contains(id)
        {
            self.hovered = None;
        }

        tracing::debug!(%category, created, removed, total = self.markers.len(), "markers synced");
        true
    }

    /// Mirror the external selection slot into the markers.
    pub fn apply_selection(&mut self, selected: Option<&ItemId>) {
        for marker in self.markers.iter_mut() {
            let event = if Some(marker.id()) == selected {
                MarkerEvent::Select
            } else {
                MarkerEvent::Deselect
            };
            marker.apply(event);
        }
    }

    /// Move hover to `id` (or nowhere), updating the cursor on change.
    pub fn set_hovered(&mut self, id: Option<&ItemId>, cursor: &mut impl CursorSink) {
        if self.hovered.as_ref() == id {
            return;
        }
        if let Some(old) = self.hovered.take()
            && let Some(marker) = self.markers.get_by_id_mut(&old)
        {
            marker.apply(MarkerEvent::PointerLeave);
        }
        if let Some(new) = id
            && let Some(marker) = self.markers.get_by_id_mut(new)
        {
            marker.apply(MarkerEvent::PointerEnter);
            self.hovered = Some(new.clone());
        }
        let hint = if self.hovered.is_some() {
            CursorHint::Pointer
        } else {
            CursorHint::Default
        };
        cursor.set_cursor(hint);
    }

    /// World-space hit volumes of every marker.
    pub fn hit_volumes(&self) -> impl Iterator<Item = (&ItemId, Capsule)> + '_ {
        let rotation = self.rotation_matrix();
        self.markers.iter().map(move |(_, m)| {
            let local = m.hit_capsule(&self.style);
            let capsule = Capsule {
                start: rotation.transform_point3(local.start),
                end: rotation.transform_point3(local.end),
                radius: local.radius,
            };
            (m.id(), capsule)
        })
    }

    /// The marker under `ray`, ignoring anything behind the globe.
    pub fn pick(&self, ray: &Ray) -> Option<ItemId> {
        pick_nearest(ray, self.hit_volumes(), Some((Vec3::ZERO, self.radius))).map(|(id, _)| id.clone())
    }

    /// Marker draw list for this frame. The buffer is reused between calls.
    pub fn marker_draws(&mut self, elapsed: f32) -> &[MarkerDraw] {
        let rotation = self.rotation_matrix();
        self.draws.clear();
        for (_, marker) in self.markers.iter() {
            let color = self.style.color(marker.category());
            let visual = marker.visual(&self.style, elapsed);
            self.draws.push(MarkerDraw {
                transform: rotation * marker.placement().transform(),
                color,
                dot_color: if marker.is_selected() { Vec3::ONE } else { color },
                visual,
            });
        }
        &self.draws
    }
}

#[cfg(test)]
mod tests {
    use orbis_geo::GeoCoordinate;

    use super::*;
    use crate::collab::Item;

    #[derive(Default)]
    struct Recorder {
        loaded: Vec<bool>,
        cursor: Vec<CursorHint>,
    }

    impl LoadingSink for Recorder {
        fn set_globe_loaded(&mut self, loaded: bool) {
            self.loaded.push(loaded);
        }
    }

    impl CursorSink for Recorder {
        fn set_cursor(&mut self, hint: CursorHint) {
            self.cursor.push(hint);
        }
    }

    fn item(id: &str, lat: f32, lng: f32, category: Category) -> Item {
        Item {
            id: ItemId::from(id),
            name: id.to_string(),
            country: String::new(),
            coordinate: GeoCoordinate::new(lat, lng),
            category,
        }
    }

    fn items() -> ItemCatalog {
        ItemCatalog::new(vec![
            item("koto", 35.6762, 139.6503, Category::Instruments),
            item("sitar", 28.6139, 77.209, Category::Instruments),
            item("fado", 38.7223, -9.1393, Category::Radio),
            item("gamelan", -7.7956, 110.3695, Category::Radio),
            item("gamelan", -7.7956, 110.3695, Category::Instruments),
        ])
    }

    fn globe() -> Globe {
        Globe::new(&GlobeConfig::default(), MarkerStyle::default())
    }

    #[test]
    fn test_idle_rotation_rates() {
        let mut g = globe();
        let mut shading = ShadingState::default();
        let mut rec = Recorder::default();
        g.update(10.0, &mut shading, &mut rec);
        assert!((g.rotation() - 0.15).abs() < 1e-6);
        assert!((g.clouds()[0].angle - 0.2).abs() < 1e-6);
        assert!((g.clouds()[1].angle + 0.08).abs() < 1e-6);
        assert!((shading.elapsed_time() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_category_switch_replaces_markers() {
        let mut g = globe();
        let items = items();
        g.sync_markers(&items, Category::Instruments);
        assert_eq!(g.markers().len(), 3);
        g.apply_selection(Some(&ItemId::from("gamelan")));

        g.sync_markers(&items, Category::Radio);
        assert_eq!(g.markers().len(), 2);
        assert!(!g.markers().contains(&ItemId::from("koto")));
        assert!(g.markers().contains(&ItemId::from("fado")));
        let shared = g.markers().get_by_id(&ItemId::from("gamelan")).unwrap();
        assert!(shared.is_selected(), "shared marker keeps its state");
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut g = globe();
        let items = items();
        assert!(g.sync_markers(&items, Category::Radio));
        let before = g.markers().handle(&ItemId::from("fado"));
        assert!(!g.sync_markers(&items, Category::Radio), "unchanged inputs skip the rebuild");
        assert_eq!(g.markers().handle(&ItemId::from("fado")), before);
    }

    #[test]
    fn test_sync_reruns_when_catalog_replaced() {
        let mut g = globe();
        let mut catalog = items();
        g.sync_markers(&catalog, Category::Radio);
        let fado = g.markers().handle(&ItemId::from("fado"));

        catalog.replace(vec![
            item("fado", 38.7223, -9.1393, Category::Radio),
            item("mariachi", 20.6597, -103.3496, Category::Radio),
        ]);
        assert!(g.sync_markers(&catalog, Category::Radio));
        assert_eq!(g.markers().len(), 2);
        assert!(!g.markers().contains(&ItemId::from("gamelan")));
        assert!(g.markers().contains(&ItemId::from("mariachi")));
        assert_eq!(g.markers().handle(&ItemId::from("fado")), fado, "survivor keeps its slot");
    }

    #[test]
    fn test_material_swaps_once_and_loaded_reported_once() {
        let mut g = globe();
        let mut shading = ShadingState::default();
        let mut rec = Recorder::default();
        assert_eq!(g.material(), GlobeMaterial::Placeholder);
        g.update(5.0, &mut shading, &mut rec);
        assert!(rec.loaded.is_empty(), "not before textures resolve");

        assert!(g.textures_resolved());
        assert!(!g.textures_resolved());
        assert_eq!(g.material(), GlobeMaterial::Realistic);

        g.update(0.5, &mut shading, &mut rec);
        assert!(rec.loaded.is_empty(), "waits for the settle delay");
        g.update(0.6, &mut shading, &mut rec);
        g.update(0.6, &mut shading, &mut rec);
        assert_eq!(rec.loaded, vec![true]);
        assert!(g.is_loaded_reported());
    }

    #[test]
    fn test_hover_updates_cursor_on_change_only() {
        let mut g = globe();
        let mut rec = Recorder::default();
        g.sync_markers(&items(), Category::Radio);
        let fado = ItemId::from("fado");
        g.set_hovered(Some(&fado), &mut rec);
        g.set_hovered(Some(&fado), &mut rec);
        assert_eq!(rec.cursor, vec![CursorHint::Pointer]);
        assert!(g.markers().get_by_id(&fado).unwrap().is_hovered());
        g.set_hovered(None, &mut rec);
        assert_eq!(rec.cursor, vec![CursorHint::Pointer, CursorHint::Default]);
        assert!(!g.markers().get_by_id(&fado).unwrap().is_hovered());
    }

    #[test]
    fn test_hovered_marker_removed_by_sync_clears_hover() {
        let mut g = globe();
        let mut rec = Recorder::default();
        g.sync_markers(&items(), Category::Radio);
        g.set_hovered(Some(&ItemId::from("fado")), &mut rec);
        g.sync_markers(&items(), Category::Instruments);
        assert!(g.hovered().is_none());
    }

    #[test]
    fn test_pick_front_marker_through_rotation() {
        let mut g = globe();
        let mut shading = ShadingState::default();
        let mut rec = Recorder::default();
        g.sync_markers(&ItemCatalog::new(vec![item("front", 0.0, -90.0, Category::Radio)]), Category::Radio);
        // (0, -90) sits on +Z before spin; spin a little and aim at it.
        g.update(20.0, &mut shading, &mut rec);
        let base = g.hit_volumes().next().unwrap().1.start;
        let ray = Ray::new(base + base.normalize() * 3.0, -base.normalize());
        assert_eq!(g.pick(&ray), Some(ItemId::from("front")));

        // From the far side the globe blocks it.
        let blocked = Ray::new(-base.normalize() * 6.0, base.normalize());
        assert_eq!(g.pick(&blocked), None);
    }

    #[test]
    fn test_marker_draws_follow_selection() {
        let mut g = globe();
        g.sync_markers(&items(), Category::Radio);
        g.apply_selection(Some(&ItemId::from("fado")));
        let draws = g.marker_draws(0.0).to_vec();
        assert_eq!(draws.len(), 2);
        let selected: Vec<_> = draws.iter().filter(|d| d.visual.pulse.is_some()).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].dot_color, Vec3::ONE);
    }
}
