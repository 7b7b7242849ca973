// src/app.rs
use crate::audio_engine::StreamEngine;
use crate::audio_io;
use crate::config;
use crate::controls::{
    ControlSurface, EventValue, FILTER_CONTROL, TOGGLE_CONTROL, TYPE_CONTROL, VOLUME_CONTROL,
};
use crate::mapping::{range_to_frequency, range_to_gain, RANGE_MAX};
use crate::settings::{NoiseType, SettingsStore};
use cpal::Stream;
use egui::{Color32, Frame, RichText, Slider};
use log::{error, info};

/// Action declarations for the form controls, as `{eventType}-{handlerName}`.
pub const CONTROL_DECLARATIONS: [(&str, &str); 4] = [
    (FILTER_CONTROL, "input-handleFilter"),
    (VOLUME_CONTROL, "input-handleVolume"),
    (TYPE_CONTROL, "change-handleType"),
    (TOGGLE_CONTROL, "submit-handleToggle"),
];

pub struct MurmurApp {
    surface: ControlSurface<StreamEngine>,
    store: SettingsStore,
    _output_stream: Option<Stream>,
    audio_status: (String, Color32),
}

impl MurmurApp {
    pub fn new(_cc: &eframe::CreationContext) -> Self {
        let config = config::load_config();
        let store = SettingsStore::open_default();
        if let Some(path) = store.path() {
            info!("Settings file: {}", path.display());
        }
        let settings = store.load();

        let (engine, output_stream, audio_status) = match audio_io::init_and_run_stream(&config) {
            Ok((engine, stream, sample_rate, buffer_size)) => {
                let status = format!(
                    "{} Hz, {}",
                    sample_rate,
                    audio_io::describe_buffer_size(buffer_size)
                );
                (engine, Some(stream), (status, Color32::GRAY))
            }
            Err(e) => {
                error!("Failed to start audio output: {:#}", e);
                let status = format!("Audio unavailable: {}", e);
                (StreamEngine::detached(), None, (status, Color32::YELLOW))
            }
        };

        let mut surface = ControlSurface::new(engine, &settings);
        let bound = surface.bind_all(CONTROL_DECLARATIONS);
        info!("{} of {} controls bound", bound, CONTROL_DECLARATIONS.len());

        Self {
            surface,
            store,
            _output_stream: output_stream,
            audio_status,
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let values = self.surface.values();

        let mut filter = values.filter;
        let filter_label = format!("Filter  {:.0} Hz", range_to_frequency(filter));
        let filter_slider =
            Slider::new(&mut filter, 0.0..=RANGE_MAX).step_by(1.0).show_value(false);
        if ui
            .add_enabled(self.surface.is_bound(FILTER_CONTROL), filter_slider.text(filter_label))
            .changed()
        {
            self.surface.dispatch(FILTER_CONTROL, "input", EventValue::Number(filter));
        }

        let mut volume = values.volume;
        let volume_label = format!("Volume  {:.2}", range_to_gain(volume));
        let volume_slider =
            Slider::new(&mut volume, 0.0..=RANGE_MAX).step_by(1.0).show_value(false);
        if ui
            .add_enabled(self.surface.is_bound(VOLUME_CONTROL), volume_slider.text(volume_label))
            .changed()
        {
            self.surface.dispatch(VOLUME_CONTROL, "input", EventValue::Number(volume));
        }

        let type_bound = self.surface.is_bound(TYPE_CONTROL);
        ui.horizontal(|ui| {
            for noise_type in NoiseType::ALL {
                let checked = values.noise_type == noise_type;
                let radio = egui::RadioButton::new(checked, noise_type.name());
                if ui.add_enabled(type_bound, radio).clicked() {
                    self.surface.dispatch(
                        TYPE_CONTROL,
                        "change",
                        EventValue::Text(noise_type.name().to_string()),
                    );
                }
            }
        });

        ui.add_space(8.0);
        let label = RichText::new(self.surface.toggle_label()).size(18.0);
        let toggle = egui::Button::new(label);
        if ui.add_enabled(self.surface.is_bound(TOGGLE_CONTROL), toggle).clicked() {
            self.surface.dispatch(TOGGLE_CONTROL, "submit", EventValue::Empty);
        }
    }
}

/// Background tint for the active indicator class, e.g. `color-pink`.
fn indicator_color(classes: &[String]) -> Color32 {
    match classes.first().map(String::as_str) {
        Some("color-white") => Color32::from_rgb(44, 46, 52),
        Some("color-pink") => Color32::from_rgb(62, 34, 48),
        Some("color-brown") => Color32::from_rgb(54, 40, 28),
        _ => Color32::from_gray(24),
    }
}

impl eframe::App for MurmurApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let background = indicator_color(&self.surface.indicators().active_classes());

        egui::CentralPanel::default()
            .frame(Frame::central_panel(&ctx.style()).fill(background))
            .show(ctx, |ui| {
                ui.heading("Murmur");
                ui.separator();
                self.draw_controls(ui);
                ui.separator();
                let (status, color) = &self.audio_status;
                ui.label(
                    RichText::new(format!("{:?}, {}", self.surface.playback_state(), status))
                        .small()
                        .color(*color),
                );
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.store.save(&self.surface.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use crate::settings::DEFAULT_SETTINGS;

    #[test]
    fn controls_stay_usable_without_audio_output() {
        let mut surface = ControlSurface::new(StreamEngine::detached(), &DEFAULT_SETTINGS);
        assert_eq!(surface.bind_all(CONTROL_DECLARATIONS), CONTROL_DECLARATIONS.len());

        assert!(surface.dispatch(TOGGLE_CONTROL, "submit", EventValue::Empty));
        assert_eq!(surface.playback_state(), PlaybackState::Playing);
        assert!(surface.dispatch(TYPE_CONTROL, "change", EventValue::Text("brown".to_string())));
        assert_eq!(surface.snapshot().noise_type, NoiseType::Brown);
        assert_eq!(surface.snapshot().filter_frequency_hz, 4186.0);
    }

    #[test]
    fn background_follows_the_active_indicator() {
        let mut surface = ControlSurface::new(StreamEngine::detached(), &DEFAULT_SETTINGS);
        surface.bind_all(CONTROL_DECLARATIONS);
        let pink = indicator_color(&surface.indicators().active_classes());
        surface.dispatch(TYPE_CONTROL, "change", EventValue::Text("white".to_string()));
        let white = indicator_color(&surface.indicators().active_classes());

        assert_eq!(pink, Color32::from_rgb(62, 34, 48));
        assert_eq!(white, Color32::from_rgb(44, 46, 52));
        assert_eq!(indicator_color(&[]), Color32::from_gray(24));
    }
}
