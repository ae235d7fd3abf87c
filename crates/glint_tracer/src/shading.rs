//! Recursive Whitted-style shading.
//!
//! Diffuse surfaces gather direct light from every point light with hard (or
//! softened) shadows. Reflect/refract surfaces split into a reflection ray and
//! a refraction ray, blended by the Fresnel term.

use glint_core::{Color, MaterialKind, Scene, ShadingConfig, TerminalColor};
use glint_math::{Ray, Vec3};

use crate::hittable::{closest_hit, occluded, Hit};
use crate::optics::{fresnel, reflect, refract};

/// Compute the colour seen along `ray`.
///
/// `depth` is the number of bounces already taken; primary rays start at 0.
pub fn cast_ray(ray: &Ray, scene: &Scene, depth: u32, settings: &ShadingConfig) -> Color {
    if depth >= settings.max_recursion {
        return terminal_color(scene, settings);
    }

    let Some(hit) = closest_hit(ray, scene) else {
        return scene.sky_color;
    };

    match hit.material.kind {
        MaterialKind::Diffuse => shade_diffuse(ray, &hit, scene, settings),
        MaterialKind::ReflectRefract => shade_reflect_refract(ray, &hit, scene, depth, settings),
    }
}

fn terminal_color(scene: &Scene, settings: &ShadingConfig) -> Color {
    match settings.terminal_color {
        TerminalColor::Sky => scene.sky_color,
        TerminalColor::Black => Color::ZERO,
    }
}

fn shade_diffuse(ray: &Ray, hit: &Hit, scene: &Scene, settings: &ShadingConfig) -> Color {
    // Light the side of the surface the ray arrived from
    let normal = if ray.direction.dot(hit.normal) > 0.0 {
        -hit.normal
    } else {
        hit.normal
    };
    let shadow_origin = hit.point + normal * settings.bias;
    let view = -ray.direction.normalize_or_zero();

    let mut color = Color::ZERO;
    for light in &scene.lights {
        let to_light = light.position - shadow_origin;
        let light_distance = to_light.length();
        if light_distance <= f32::EPSILON {
            continue;
        }
        let light_dir = to_light / light_distance;

        let n_dot_l = normal.dot(light_dir).max(0.0);
        let shadow_ray = Ray::new(shadow_origin, light_dir);
        let shadowed = occluded(&shadow_ray, scene, light_distance);
        let visibility = if shadowed { settings.shadow_factor } else { 1.0 };

        color += light.color * n_dot_l * visibility;

        if let (Some(shininess), false) = (settings.shininess, shadowed) {
            let highlight = reflect(-light_dir, normal).dot(view).max(0.0);
            color += light.color * highlight.powf(shininess);
        }
    }

    color.clamp(Vec3::ZERO, Vec3::ONE)
}

fn shade_reflect_refract(
    ray: &Ray,
    hit: &Hit,
    scene: &Scene,
    depth: u32,
    settings: &ShadingConfig,
) -> Color {
    let direction = ray.direction.normalize_or_zero();
    let ior = hit.material.refractive_index;
    let fr = fresnel(direction, hit.normal, ior);

    let outside = direction.dot(hit.normal) < 0.0;
    let bias = hit.normal * settings.bias;

    let reflect_origin = if outside { hit.point + bias } else { hit.point - bias };
    let reflect_ray = Ray::new(reflect_origin, reflect(direction, hit.normal).normalize_or_zero());
    let reflection = cast_ray(&reflect_ray, scene, depth + 1, settings);

    let mut refraction = Color::ZERO;
    if fr < 1.0 {
        let refract_dir = refract(direction, hit.normal, ior);
        if refract_dir != Vec3::ZERO {
            let refract_origin = if outside { hit.point - bias } else { hit.point + bias };
            let refract_ray = Ray::new(refract_origin, refract_dir.normalize_or_zero());
            refraction = cast_ray(&refract_ray, scene, depth + 1, settings);
        }
    }

    (reflection * fr + refraction * (1.0 - fr)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Map a linear channel value to a byte. NaN maps to 0, ties round to even.
#[inline]
pub fn quantize(channel: f32) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round_ties_even() as u8
}

/// Convert a colour to opaque 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Pack RGBA bytes so the in-memory byte order is R, G, B, A.
#[inline]
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_ne_bytes(rgba)
}

#[inline]
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_ne_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Material;

    const SKY: Vec3 = Vec3::new(0.2, 0.3, 0.4);

    fn lit_sphere_scene() -> Scene {
        let mut scene = Scene::new(SKY);
        scene.add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::diffuse());
        scene.add_light(Vec3::new(0.0, 5.0, 0.0), Color::ONE);
        scene
    }

    fn forward() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    #[test]
    fn test_miss_returns_sky() {
        let scene = lit_sphere_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let color = cast_ray(&ray, &scene, 0, &ShadingConfig::default());

        assert_eq!(color, SKY);
        assert_eq!(color_to_rgba(color), [51, 76, 102, 255]);
    }

    #[test]
    fn test_recursion_limit_returns_terminal_color() {
        let scene = lit_sphere_scene();
        let mut settings = ShadingConfig {
            max_recursion: 0,
            ..Default::default()
        };
        assert_eq!(cast_ray(&forward(), &scene, 0, &settings), SKY);

        settings.terminal_color = TerminalColor::Black;
        assert_eq!(cast_ray(&forward(), &scene, 0, &settings), Color::ZERO);
    }

    #[test]
    fn test_diffuse_lambert_term() {
        let scene = lit_sphere_scene();
        let color = cast_ray(&forward(), &scene, 0, &ShadingConfig::default());

        // Hit (0,0,-4) with normal +Z; light direction is (0,5,4) normalised
        let expected = 4.0 / 41.0_f32.sqrt();
        assert!((color.x - expected).abs() < 1e-2);
        assert!((color.x - color.y).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_factor() {
        let mut scene = lit_sphere_scene();
        // Sits on the segment between the hit point and the light
        scene.add_sphere(Vec3::new(0.0, 2.5, -2.0), 0.5, Material::diffuse());

        let hard = cast_ray(&forward(), &scene, 0, &ShadingConfig::default());
        assert_eq!(hard, Color::ZERO);

        let soft_settings = ShadingConfig {
            shadow_factor: 0.5,
            ..Default::default()
        };
        let soft = cast_ray(&forward(), &scene, 0, &soft_settings);
        let expected = 0.5 * 4.0 / 41.0_f32.sqrt();
        assert!((soft.x - expected).abs() < 1e-2);
    }

    #[test]
    fn test_occluder_beyond_light_ignored() {
        let mut scene = lit_sphere_scene();
        scene.add_sphere(Vec3::new(0.0, 10.0, 4.0), 1.0, Material::diffuse());

        let color = cast_ray(&forward(), &scene, 0, &ShadingConfig::default());
        assert!(color.x > 0.5);
    }

    #[test]
    fn test_specular_adds_highlight() {
        let mut scene = Scene::new(SKY);
        scene.add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::diffuse());
        // Light behind the eye: highlight is at the centre of the sphere
        scene.add_light(Vec3::new(0.0, 0.0, 5.0), Color::splat(0.5));

        let plain = cast_ray(&forward(), &scene, 0, &ShadingConfig::default());
        let shiny_settings = ShadingConfig {
            shininess: Some(16.0),
            ..Default::default()
        };
        let shiny = cast_ray(&forward(), &scene, 0, &shiny_settings);

        assert!((plain.x - 0.5).abs() < 1e-3);
        assert!((shiny.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_mirror_reflects_sky() {
        let mut scene = Scene::new(SKY);
        scene.add_plane(Vec3::Y, Vec3::new(0.0, -1.0, 0.0), Material::mirror());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0).normalize());
        let color = cast_ray(&ray, &scene, 0, &ShadingConfig::default());
        assert!((color - SKY).length() < 1e-5);

        // The reflected ray is already at the limit
        let shallow = ShadingConfig {
            max_recursion: 1,
            terminal_color: TerminalColor::Black,
            ..Default::default()
        };
        assert_eq!(cast_ray(&ray, &scene, 0, &shallow), Color::ZERO);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(7.0), 255);
        assert_eq!(quantize(f32::INFINITY), 255);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_pack_byte_order() {
        let packed = pack_rgba([1, 2, 3, 4]);
        assert_eq!(packed.to_ne_bytes(), [1, 2, 3, 4]);
        assert_eq!(unpack_rgba(packed), [1, 2, 3, 4]);
    }
}
