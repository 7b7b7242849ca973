// src/controls.rs

//! The control surface: named handlers bound to UI controls through
//! declarative `{eventType}-{handlerName}` action strings.
//!
//! Parameter handlers convert slider positions through [`crate::mapping`] and
//! set the engine immediately. Only start/stop ramps, and those belong to
//! [`Playback`].

use crate::audio_engine::AudioEngine;
use crate::mapping::{frequency_to_range, gain_to_range, range_to_frequency, range_to_gain};
use crate::playback::{Playback, PlaybackState};
use crate::settings::{NoiseType, Settings};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

pub const FILTER_CONTROL: &str = "filter";
pub const VOLUME_CONTROL: &str = "volume";
pub const TYPE_CONTROL: &str = "type";
pub const TOGGLE_CONTROL: &str = "start";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("malformed action `{0}`, expected `{{eventType}}-{{handlerName}}`")]
    Malformed(String),
    #[error("No handler found for {event_type} / {handler_name}")]
    UnknownHandler {
        event_type: String,
        handler_name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Volume,
    Filter,
    Type,
    Toggle,
}

impl Handler {
    pub const ALL: [Handler; 4] = [
        Handler::Volume,
        Handler::Filter,
        Handler::Type,
        Handler::Toggle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Handler::Volume => "handleVolume",
            Handler::Filter => "handleFilter",
            Handler::Type => "handleType",
            Handler::Toggle => "handleToggle",
        }
    }
}

/// A parsed action declaration, e.g. `input-handleVolume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub event_type: String,
    pub handler: Handler,
}

impl FromStr for ActionBinding {
    type Err = BindingError;

    fn from_str(declaration: &str) -> Result<Self, Self::Err> {
        let (event_type, handler_name) = declaration
            .split_once('-')
            .filter(|(event_type, _)| !event_type.is_empty())
            .ok_or_else(|| BindingError::Malformed(declaration.to_string()))?;
        let handler = Handler::ALL
            .into_iter()
            .find(|h| h.name() == handler_name)
            .ok_or_else(|| BindingError::UnknownHandler {
                event_type: event_type.to_string(),
                handler_name: handler_name.to_string(),
            })?;
        Ok(Self {
            event_type: event_type.to_string(),
            handler,
        })
    }
}

/// The payload a control delivers with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Number(f64),
    Text(String),
    Empty,
}

impl EventValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            EventValue::Number(n) => Some(*n),
            EventValue::Text(s) => s.trim().parse().ok(),
            EventValue::Empty => None,
        }
    }
}

/// Current positions of the three controls. Sliders are in the 0-100 control range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlValues {
    pub filter: f64,
    pub volume: f64,
    pub noise_type: NoiseType,
}

/// One visual indicator per noise color; exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorIndicators {
    active: [bool; 3],
}

impl ColorIndicators {
    pub fn activate(&mut self, noise_type: NoiseType) {
        for (slot, candidate) in self.active.iter_mut().zip(NoiseType::ALL) {
            *slot = candidate == noise_type;
        }
    }

    pub fn is_active(&self, noise_type: NoiseType) -> bool {
        NoiseType::ALL
            .iter()
            .position(|t| *t == noise_type)
            .is_some_and(|i| self.active[i])
    }

    pub fn active(&self) -> Option<NoiseType> {
        NoiseType::ALL.into_iter().find(|t| self.is_active(*t))
    }

    /// Presentation class names of the active indicators, e.g. `color-pink`.
    pub fn active_classes(&self) -> Vec<String> {
        self.active().into_iter().map(|t| format!("color-{}", t)).collect()
    }
}

pub struct ControlSurface<E: AudioEngine> {
    engine: E,
    playback: Playback,
    values: ControlValues,
    /// Physical cutoff last sent to the engine; only a slider move replaces it.
    filter_hz: f64,
    indicators: ColorIndicators,
    bindings: BTreeMap<String, ActionBinding>,
}

impl<E: AudioEngine> ControlSurface<E> {
    /// Takes ownership of the engine and places every control from `settings`.
    pub fn new(engine: E, settings: &Settings) -> Self {
        let mut surface = Self {
            engine,
            playback: Playback::new(),
            values: ControlValues {
                filter: frequency_to_range(settings.filter_frequency_hz),
                volume: gain_to_range(settings.volume),
                noise_type: settings.noise_type,
            },
            filter_hz: settings.filter_frequency_hz,
            indicators: ColorIndicators::default(),
            bindings: BTreeMap::new(),
        };
        surface.initialize(settings);
        surface
    }

    pub fn initialize(&mut self, settings: &Settings) {
        self.values.filter = frequency_to_range(settings.filter_frequency_hz);
        self.filter_hz = settings.filter_frequency_hz;
        self.engine.set_filter_frequency(self.filter_hz);
        self.values.volume = gain_to_range(settings.volume);
        self.change_noise_type(settings.noise_type);
    }

    /// Binds one control. On error the control stays unbound.
    pub fn bind(&mut self, control: &str, declaration: &str) -> Result<(), BindingError> {
        let binding: ActionBinding = declaration.parse()?;
        debug!(
            "Bound `{}` {} events to {}",
            control,
            binding.event_type,
            binding.handler.name()
        );
        self.bindings.insert(control.to_string(), binding);
        Ok(())
    }

    /// Binds every `(control, declaration)` pair, skipping the ones that fail.
    /// Returns how many were bound.
    pub fn bind_all<'a>(
        &mut self,
        declarations: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        declarations
            .into_iter()
            .filter(|(control, declaration)| match self.bind(control, declaration) {
                Ok(()) => true,
                Err(e) => {
                    warn!("{} (control `{}` left non-interactive)", e, control);
                    false
                }
            })
            .count()
    }

    pub fn is_bound(&self, control: &str) -> bool {
        self.bindings.contains_key(control)
    }

    /// Routes a UI event to the handler bound to `control`. Returns whether a handler ran.
    pub fn dispatch(&mut self, control: &str, event_type: &str, value: EventValue) -> bool {
        let Some(binding) = self.bindings.get(control) else {
            debug!("Ignoring {} on unbound control `{}`", event_type, control);
            return false;
        };
        if binding.event_type != event_type {
            debug!(
                "Ignoring {} on `{}`, bound to {} events",
                event_type, control, binding.event_type
            );
            return false;
        }

        let handler = binding.handler;
        match handler {
            Handler::Volume | Handler::Filter => {
                let Some(number) = value.as_number() else {
                    warn!("{} expects a number, got {:?}", handler.name(), value);
                    return false;
                };
                if handler == Handler::Volume {
                    self.change_volume(number);
                } else {
                    self.change_filter(number);
                }
            }
            Handler::Type => {
                let parsed = match &value {
                    EventValue::Text(name) => name.parse::<NoiseType>(),
                    other => Err(anyhow::anyhow!("expected a noise type name, got {:?}", other)),
                };
                match parsed {
                    Ok(noise_type) => self.change_noise_type(noise_type),
                    Err(e) => {
                        warn!("Ignoring noise type change: {}", e);
                        return false;
                    }
                }
            }
            Handler::Toggle => {
                self.toggle();
            }
        }
        true
    }

    pub fn change_volume(&mut self, value: f64) {
        self.values.volume = value;
        self.engine.set_gain(range_to_gain(value));
    }

    pub fn change_filter(&mut self, value: f64) {
        self.values.filter = value;
        self.filter_hz = range_to_frequency(value);
        self.engine.set_filter_frequency(self.filter_hz);
    }

    pub fn change_noise_type(&mut self, noise_type: NoiseType) {
        self.values.noise_type = noise_type;
        self.engine.set_noise_type(noise_type);
        self.indicators.activate(noise_type);
    }

    pub fn toggle(&mut self) -> PlaybackState {
        let target_gain = range_to_gain(self.values.volume);
        self.playback.toggle(&mut self.engine, target_gain)
    }

    /// Reads the current control values back into physical units for persisting.
    pub fn snapshot(&self) -> Settings {
        Settings {
            filter_frequency_hz: self.filter_hz,
            volume: range_to_gain(self.values.volume),
            noise_type: self.values.noise_type,
        }
    }

    pub fn values(&self) -> ControlValues {
        self.values
    }

    pub fn indicators(&self) -> ColorIndicators {
        self.indicators
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn toggle_label(&self) -> &'static str {
        self.playback.state().toggle_label()
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
