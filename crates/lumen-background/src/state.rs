//! Background selection and dispatch.

use lumen_core::{BackgroundKind, DisplayMode};
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    widgets::Widget,
};

use crate::animations::network::{Network, NetworkSettings};
use crate::animations::particles::{ParticleStream, StreamSettings};
use crate::component::{
    Background, BackgroundOptions, NetworkBackground, ParticleStreamBackground,
};
use crate::host::HostEvents;

/// Everything needed to build either background.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundSettings {
    pub options: BackgroundOptions,
    pub network: NetworkSettings,
    pub particles: StreamSettings,
}

/// The background currently shown on a screen.
#[derive(Debug)]
pub enum BackgroundState {
    Network(NetworkBackground),
    Particles(ParticleStreamBackground),
}

impl BackgroundState {
    /// Build an unmounted background of the given kind.
    pub fn new(kind: BackgroundKind, settings: &BackgroundSettings, mode: DisplayMode) -> Self {
        match kind {
            BackgroundKind::Network => Self::Network(Background::new(
                Network::new(settings.network.clone()),
                mode,
                settings.options,
            )),
            BackgroundKind::Particles => Self::Particles(Background::new(
                ParticleStream::new(settings.particles.clone()),
                mode,
                settings.options,
            )),
        }
    }

    pub fn kind(&self) -> BackgroundKind {
        match self {
            Self::Network(_) => BackgroundKind::Network,
            Self::Particles(_) => BackgroundKind::Particles,
        }
    }

    pub fn mount(&mut self, host: &mut HostEvents, size: Size, now_ms: u64) -> bool {
        match self {
            Self::Network(bg) => bg.mount(host, size, now_ms),
            Self::Particles(bg) => bg.mount(host, size, now_ms),
        }
    }

    pub fn teardown(&mut self, host: &mut HostEvents) {
        match self {
            Self::Network(bg) => bg.teardown(host),
            Self::Particles(bg) => bg.teardown(host),
        }
    }

    pub fn set_mode(&mut self, host: &mut HostEvents, mode: DisplayMode, now_ms: u64) {
        match self {
            Self::Network(bg) => bg.set_mode(host, mode, now_ms),
            Self::Particles(bg) => bg.set_mode(host, mode, now_ms),
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self {
            Self::Network(bg) => bg.tick(now_ms),
            Self::Particles(bg) => bg.tick(now_ms),
        }
    }

    pub fn is_mounted(&self) -> bool {
        match self {
            Self::Network(bg) => bg.is_mounted(),
            Self::Particles(bg) => bg.is_mounted(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        match self {
            Self::Network(bg) => bg.mode(),
            Self::Particles(bg) => bg.mode(),
        }
    }

    pub fn entity_count(&self) -> usize {
        match self {
            Self::Network(bg) => bg.entity_count(),
            Self::Particles(bg) => bg.entity_count(),
        }
    }

    pub fn time_until_next_frame(&self, now_ms: u64) -> Option<u64> {
        match self {
            Self::Network(bg) => bg.time_until_next_frame(now_ms),
            Self::Particles(bg) => bg.time_until_next_frame(now_ms),
        }
    }
}

impl Widget for &BackgroundState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self {
            BackgroundState::Network(bg) => bg.render(area, buf),
            BackgroundState::Particles(bg) => bg.render(area, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_selects_animation() {
        let settings = BackgroundSettings::default();
        let net = BackgroundState::new(BackgroundKind::Network, &settings, DisplayMode::Dark);
        let parts = BackgroundState::new(BackgroundKind::Particles, &settings, DisplayMode::Light);
        assert_eq!(net.kind(), BackgroundKind::Network);
        assert_eq!(parts.kind(), BackgroundKind::Particles);
        assert_eq!(parts.mode(), DisplayMode::Light);
    }

    #[test]
    fn test_entity_counts_follow_settings() {
        let mut settings = BackgroundSettings::default();
        settings.network.node_count = 12;
        settings.particles.particle_count = 7;
        let mut host = HostEvents::new();

        let mut net = BackgroundState::new(BackgroundKind::Network, &settings, DisplayMode::Dark);
        let mut parts =
            BackgroundState::new(BackgroundKind::Particles, &settings, DisplayMode::Dark);
        assert!(net.mount(&mut host, Size::new(40, 10), 0));
        assert!(parts.mount(&mut host, Size::new(40, 10), 0));
        assert_eq!(net.entity_count(), 12);
        assert_eq!(parts.entity_count(), 7);

        net.teardown(&mut host);
        parts.teardown(&mut host);
        assert_eq!(host.pointer_listener_count(), 0);
    }

    #[test]
    fn test_default_counts() {
        let settings = BackgroundSettings::default();
        assert_eq!(settings.network.node_count, 120);
        assert_eq!(settings.particles.particle_count, 150);
        assert_eq!(settings.particles.trail_length, 15);
    }
}
