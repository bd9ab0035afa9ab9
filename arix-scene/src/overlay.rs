//! This module handles the keyboard controls and the greeting dialog drawn over the scene.

use crate::{bevy_setup::ActiveConfig, greeting_task::GreetingRuntime};
use arix_config::{Theme, TreeConfig};
use bevy::prelude::*;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// The longest recipient name that can be typed, in characters.
pub const MAX_RECIPIENT_LEN: usize = 64;

/// The colour of the overlay text.
const GOLD: Color = Color::rgb(0.831, 0.686, 0.216);

/// The greeting dialog state.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct GreetingDialog {
    /// Is the dialog being shown?
    pub open: bool,

    /// The name typed so far.
    pub recipient: String,

    /// The last greeting received. Empty until one arrives.
    pub generated_text: String,

    /// Are we waiting on a greeting?
    pub loading: bool,
}

impl GreetingDialog {
    /// Show the dialog, keeping whatever was in it before.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the dialog. A pending greeting still lands in it.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Is the dialog showing a finished greeting rather than the name input?
    pub fn showing_greeting(&self) -> bool {
        !self.generated_text.is_empty()
    }

    /// Type a character into the recipient name.
    pub fn type_char(&mut self, c: char) {
        if c.is_control()
            || self.showing_greeting()
            || self.recipient.chars().count() >= MAX_RECIPIENT_LEN
        {
            return;
        }
        self.recipient.push(c);
    }

    /// Delete the last character of the recipient name.
    pub fn backspace(&mut self) {
        if !self.showing_greeting() {
            self.recipient.pop();
        }
    }

    /// Handle the user pressing enter.
    ///
    /// With a greeting showing, this clears the dialog to write another. Otherwise it returns the
    /// recipient to request a greeting for, unless the name is empty or a request is already
    /// pending.
    pub fn submit(&mut self) -> Option<String> {
        if self.showing_greeting() {
            self.generated_text.clear();
            self.recipient.clear();
            return None;
        }

        if self.recipient.is_empty() || self.loading {
            return None;
        }

        self.loading = true;
        Some(self.recipient.clone())
    }

    /// Show a finished greeting.
    pub fn receive(&mut self, text: String) {
        self.generated_text = text;
        self.loading = false;
    }

    /// The text of the dialog, or an empty string if it's closed.
    pub fn text(&self) -> String {
        if !self.open {
            return String::new();
        }

        let body = if self.showing_greeting() {
            format!("\"{}\"\n\n[Enter] Write Another", self.generated_text)
        } else {
            let action = if self.loading {
                "Consulting the Stars..."
            } else {
                "[Enter] Generate Inscription"
            };
            format!("RECIPIENT NAME\n{}_\n\n{action}", self.recipient)
        };

        format!("The Royal Scribe\n\n{body}\n\n[Esc] Close\nPowered by Gemini")
    }
}

/// A keyboard control of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    /// Switch to a theme.
    Theme(Theme),

    /// Start or stop the rotation.
    ToggleRotation,

    /// Swap between dim and bright lights.
    ToggleIntensity,

    /// Open the greeting dialog.
    OpenGreeting,
}

impl Control {
    /// Apply this control.
    pub fn apply(self, config: &mut TreeConfig, dialog: &mut GreetingDialog) {
        match self {
            Self::Theme(theme) => config.apply_theme(theme),
            Self::ToggleRotation => config.toggle_rotation(),
            Self::ToggleIntensity => config.toggle_intensity(),
            Self::OpenGreeting => dialog.open(),
        }
    }
}

/// The control bound to a key, if any. Only used while the dialog is closed.
pub fn control_for_key(key: KeyCode) -> Option<Control> {
    Some(match key {
        KeyCode::Key1 => Control::Theme(Theme::RoyalGold),
        KeyCode::Key2 => Control::Theme(Theme::VelvetRose),
        KeyCode::Key3 => Control::Theme(Theme::FrostSilver),
        KeyCode::Space => Control::ToggleRotation,
        KeyCode::L => Control::ToggleIntensity,
        KeyCode::G => Control::OpenGreeting,
        _ => return None,
    })
}

/// The text listing the controls, with the active theme and states marked.
pub fn controls_text(config: &TreeConfig) -> String {
    let active = config.active_theme();
    let themes: Vec<String> = Theme::iter()
        .enumerate()
        .map(|(i, theme)| {
            if Some(theme) == active {
                format!("[{}] <{theme}>", i + 1)
            } else {
                format!("[{}] {theme}", i + 1)
            }
        })
        .collect();

    format!(
        "AESTHETIC\n{}\n\n[Space] Rotation: {}\n[L] {}\n[G] Compose Royal Greeting",
        themes.join("  "),
        if config.is_rotating { "On" } else { "Off" },
        config.intensity_label(),
    )
}

/// The title of the window, showing the status of the tree.
pub fn window_title(title: &str, config: &TreeConfig) -> String {
    let theme = config
        .active_theme()
        .map_or_else(|| "Custom".to_string(), |theme| theme.to_string());
    let rotation = if config.is_rotating { "rotating" } else { "still" };

    format!("{title} | {theme} | {rotation}")
}

/// How to draw the overlay.
#[derive(Resource, Clone, Debug)]
pub struct OverlayConfig {
    /// The path of the font file.
    pub font: String,

    /// The base title of the window.
    pub title: String,
}

/// The text listing the controls.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct ControlsText;

/// The text of the greeting dialog.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct DialogText;

/// Spawn the overlay text.
pub(super) fn setup_overlay(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    overlay: Res<OverlayConfig>,
) {
    let font: Handle<Font> = asset_server.load(overlay.font.as_str());

    commands.spawn(
        TextBundle::from_section(
            "ARIX\nSIGNATURE COLLECTION",
            TextStyle {
                font: font.clone(),
                font_size: 36.,
                color: GOLD,
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            position: UiRect {
                top: Val::Px(24.),
                left: Val::Px(32.),
                ..default()
            },
            ..default()
        }),
    );

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font: font.clone(),
                font_size: 18.,
                color: GOLD,
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            position: UiRect {
                bottom: Val::Px(24.),
                left: Val::Px(32.),
                ..default()
            },
            ..default()
        }),
        ControlsText,
    ));

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font,
                font_size: 22.,
                color: Color::WHITE,
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            position: UiRect {
                top: Val::Percent(30.),
                left: Val::Percent(30.),
                ..default()
            },
            max_size: Size::new(Val::Percent(40.), Val::Auto),
            ..default()
        }),
        DialogText,
    ));
}

/// Handle the keyboard, either as controls or as typing into the dialog.
pub(super) fn overlay_input(
    keys: Res<Input<KeyCode>>,
    mut chars: EventReader<ReceivedCharacter>,
    mut config: ResMut<ActiveConfig>,
    mut dialog: ResMut<GreetingDialog>,
    greetings: Res<GreetingRuntime>,
) {
    if !dialog.open {
        for &key in keys.get_just_pressed() {
            let Some(control) = control_for_key(key) else {
                continue;
            };
            debug!(?control, "Applying control");

            if control == Control::OpenGreeting {
                // Opening the dialog doesn't change the config
                control.apply(&mut config.bypass_change_detection().0, &mut dialog);
                info!("Opened greeting dialog");
            } else {
                control.apply(&mut config, &mut dialog);
            }
        }

        // The key that opened the dialog shouldn't be typed into it
        chars.iter().for_each(drop);
        return;
    }

    if keys.just_pressed(KeyCode::Escape) {
        dialog.close();
        chars.iter().for_each(drop);
        return;
    }

    if keys.just_pressed(KeyCode::Return) || keys.just_pressed(KeyCode::NumpadEnter) {
        if let Some(recipient) = dialog.submit() {
            info!(?recipient, "Requesting greeting");
            greetings.request(recipient);
        }
    }

    if keys.just_pressed(KeyCode::Back) {
        dialog.backspace();
    }

    for event in chars.iter() {
        dialog.type_char(event.char);
    }
}

/// Put finished greetings into the dialog.
pub(super) fn receive_greetings(
    greetings: Res<GreetingRuntime>,
    mut dialog: ResMut<GreetingDialog>,
) {
    while let Some(text) = greetings.try_recv() {
        dialog.receive(text);
    }
}

/// Redraw the overlay text and the window title when their state changes.
pub(super) fn update_overlay(
    config: Res<ActiveConfig>,
    dialog: Res<GreetingDialog>,
    overlay: Res<OverlayConfig>,
    mut windows: ResMut<Windows>,
    mut controls: Query<&mut Text, (With<ControlsText>, Without<DialogText>)>,
    mut dialog_text: Query<&mut Text, (With<DialogText>, Without<ControlsText>)>,
) {
    if config.is_changed() {
        let text = controls_text(&config);
        for mut controls in controls.iter_mut() {
            controls.sections[0].value = text.clone();
        }

        if let Some(window) = windows.get_primary_mut() {
            window.set_title(window_title(&overlay.title, &config));
        }
    }

    if dialog.is_changed() {
        let text = dialog.text();
        for mut dialog_text in dialog_text.iter_mut() {
            dialog_text.sections[0].value = text.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_typing_test() {
        let mut dialog = GreetingDialog::default();
        dialog.open();

        for c in "Lady Victoria\n".chars() {
            dialog.type_char(c);
        }
        assert_eq!(dialog.recipient, "Lady Victoria");

        dialog.backspace();
        dialog.backspace();
        assert_eq!(dialog.recipient, "Lady Victor");

        for _ in 0..100 {
            dialog.type_char('a');
        }
        assert_eq!(dialog.recipient.len(), MAX_RECIPIENT_LEN);
    }

    #[test]
    fn dialog_typing_non_ascii_test() {
        let mut dialog = GreetingDialog::default();
        dialog.open();

        for _ in 0..100 {
            dialog.type_char('é');
        }
        assert_eq!(dialog.recipient.chars().count(), MAX_RECIPIENT_LEN);
        assert_eq!(dialog.recipient.len(), 2 * MAX_RECIPIENT_LEN);

        dialog.backspace();
        assert_eq!(dialog.recipient.chars().count(), MAX_RECIPIENT_LEN - 1);

        // The last character fits even when it's wider than one byte
        dialog.type_char('😀');
        dialog.type_char('😀');
        assert_eq!(dialog.recipient.chars().count(), MAX_RECIPIENT_LEN);
        assert!(dialog.recipient.ends_with("é😀"));
    }

    #[test]
    fn dialog_submit_test() {
        let mut dialog = GreetingDialog::default();
        dialog.open();
        assert_eq!(dialog.submit(), None);
        assert!(!dialog.loading);

        dialog.type_char('V');
        assert_eq!(dialog.submit(), Some("V".to_string()));
        assert!(dialog.loading);
        assert!(dialog.text().contains("Consulting the Stars..."));

        // No second request while one is pending
        assert_eq!(dialog.submit(), None);

        dialog.close();
        dialog.receive("Joyeux Noel".to_string());
        assert!(!dialog.loading);
        assert_eq!(dialog.text(), "");

        dialog.open();
        assert!(dialog.showing_greeting());
        assert!(dialog.text().contains("\"Joyeux Noel\""));

        // Typing is ignored while a greeting is shown
        dialog.type_char('x');
        dialog.backspace();
        assert_eq!(dialog.recipient, "V");

        // Enter clears the dialog to write another
        assert_eq!(dialog.submit(), None);
        assert_eq!(dialog.recipient, "");
        assert_eq!(dialog.generated_text, "");
        assert!(dialog.text().contains("[Enter] Generate Inscription"));
    }

    #[test]
    fn control_test() {
        assert_eq!(
            control_for_key(KeyCode::Key2),
            Some(Control::Theme(Theme::VelvetRose))
        );
        assert_eq!(control_for_key(KeyCode::Space), Some(Control::ToggleRotation));
        assert_eq!(control_for_key(KeyCode::Q), None);

        let mut config = TreeConfig::default();
        let mut dialog = GreetingDialog::default();

        Control::Theme(Theme::FrostSilver).apply(&mut config, &mut dialog);
        assert_eq!(config.active_theme(), Some(Theme::FrostSilver));

        Control::ToggleIntensity.apply(&mut config, &mut dialog);
        assert_eq!(config.intensity, 0.5);
        Control::ToggleIntensity.apply(&mut config, &mut dialog);
        assert_eq!(config.intensity, 2.);

        Control::ToggleRotation.apply(&mut config, &mut dialog);
        assert!(!config.is_rotating);

        let before = config.clone();
        Control::OpenGreeting.apply(&mut config, &mut dialog);
        assert!(dialog.open);
        assert_eq!(config, before);
    }

    #[test]
    fn controls_text_test() {
        let text = controls_text(&TreeConfig::default());
        assert!(text.contains("[1] <Royal Gold>"));
        assert!(text.contains("[2] Velvet Rose"));
        assert!(text.contains("Rotation: On"));
        assert!(text.contains("[L] Dim Lights"));

        let mut config = TreeConfig::default();
        config.toggle_intensity();
        config.toggle_rotation();
        config.apply_theme(Theme::FrostSilver);
        let text = controls_text(&config);
        assert!(text.contains("[3] <Frost Silver>"));
        assert!(text.contains("Rotation: Off"));
        assert!(text.contains("[L] High Beam"));
    }

    #[test]
    fn window_title_test() {
        assert_eq!(
            window_title("Arix", &TreeConfig::default()),
            "Arix | Royal Gold | rotating"
        );

        let mut config = TreeConfig::default();
        config.ornament_colour = [1, 2, 3];
        config.toggle_rotation();
        assert_eq!(window_title("Arix", &config), "Arix | Custom | still");
    }
}
