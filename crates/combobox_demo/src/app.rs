//! The demo form.
//!
//! Four combobox fields stacked vertically. The focused field receives keys;
//! debounce and search messages are routed to the field that issued them.

use std::time::Duration;

use combobox::key::help_line;
use combobox::{
    ChangeMsg, Combobox, ComboboxConfig, ConfigError, Mode, SearchSubmitMsg, StaticSearchSource,
};
use tea_core::{Cmd, KeyMsg, Message, Model};
use tracing::{debug, info};

use crate::catalogue;
use crate::config::DemoConfig;

/// Simulated network latency of the offline catalogue.
const OFFLINE_LATENCY: Duration = Duration::from_millis(250);
const MAX_PRODUCT_SUGGESTIONS: usize = 10;

pub struct App {
    fields: Vec<Combobox>,
    focus: usize,
    status: Option<String>,
    summary: Option<Vec<String>>,
}

impl App {
    pub fn new(config: &DemoConfig) -> Result<Self, ConfigError> {
        let base = |mode: Mode, label: &str| {
            ComboboxConfig::new(mode)
                .with_label(label)
                .with_width(config.width)
                .with_theme(config.theme)
                .with_debounce_ms(config.debounce_ms)
        };

        let product_config = base(Mode::Search, "Product")
            .with_placeholder("Search products or ask a question...")
            .with_max_suggestions(MAX_PRODUCT_SUGGESTIONS);
        let product = if config.offline {
            let source = StaticSearchSource::new(catalogue::products())
                .with_latency(OFFLINE_LATENCY)
                .with_limit(MAX_PRODUCT_SUGGESTIONS);
            Combobox::with_source(product_config, source)?
        } else {
            Combobox::new(product_config.with_api(config.api.clone()))?
        };

        let department = Combobox::new(
            base(Mode::Select, "Department")
                .with_placeholder("Choose a department...")
                .with_options(catalogue::departments())
                .required(),
        )?;
        let office = Combobox::new(
            base(Mode::Select, "Office")
                .with_placeholder("Choose an office...")
                .with_options(catalogue::offices())
                .clearable(),
        )?;
        let skills = Combobox::new(
            base(Mode::MultiSelect, "Skills")
                .with_placeholder("Pick up to 3 skills...")
                .with_options(catalogue::skills())
                .with_max_selections(3)
                .clearable(),
        )?;

        let mut fields = vec![product, department, office, skills];
        fields[0].focus();
        Ok(Self {
            fields,
            focus: 0,
            status: None,
            summary: None,
        })
    }

    pub fn fields(&self) -> &[Combobox] {
        &self.fields
    }

    pub const fn focused(&self) -> usize {
        self.focus
    }

    /// The submitted values, once the form validated.
    pub fn summary(&self) -> Option<&[String]> {
        self.summary.as_deref()
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields.len();
        self.fields[self.focus].blur();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
        self.fields[self.focus].focus();
        debug!(field = self.focus, "focus moved");
    }

    fn on_change(&mut self, change: &ChangeMsg) {
        let Some(field) = self.fields.iter_mut().find(|f| f.id() == change.id) else {
            return;
        };
        info!(
            field = field.label().unwrap_or_default(),
            value = ?change.value,
            "field changed"
        );
        field.set_error(None);
        self.summary = None;
    }

    fn submit(&mut self) {
        let mut valid = true;
        for field in &mut self.fields {
            match field.validate() {
                Ok(()) => field.set_error(None),
                Err(err) => {
                    valid = false;
                    field.set_error(Some(err.to_string()));
                }
            }
        }
        if !valid {
            self.status = Some("Please fix the highlighted fields.".to_string());
            info!("form submitted with errors");
            return;
        }
        let summary: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.label().unwrap_or_default(), display_value(f)))
            .collect();
        info!(?summary, "form submitted");
        self.status = Some("Application submitted.".to_string());
        self.summary = Some(summary);
    }
}

fn display_value(field: &Combobox) -> String {
    if field.is_empty() {
        return "(none)".to_string();
    }
    match field.state().mode() {
        Mode::Search => field.state().input_text().to_string(),
        Mode::Select | Mode::MultiSelect => field
            .state()
            .selection()
            .options()
            .iter()
            .map(|o| o.label())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

impl Model for App {
    fn init(&self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: Message) -> Option<Cmd> {
        if let Some(change) = msg.downcast_ref::<ChangeMsg>() {
            let change = change.clone();
            self.on_change(&change);
            return None;
        }
        if let Some(submit) = msg.downcast_ref::<SearchSubmitMsg>() {
            info!(query = %submit.query, "search submitted");
            self.status = Some(format!("Searching for \"{}\"", submit.query));
            return None;
        }

        let key = msg.downcast_ref::<KeyMsg>().map(ToString::to_string);
        if let Some(key) = key {
            match key.as_str() {
                "tab" if !self.fields[self.focus].has_ghost() => {
                    self.move_focus(true);
                    return None;
                }
                "shift+tab" => {
                    self.move_focus(false);
                    return None;
                }
                "ctrl+s" => {
                    self.submit();
                    return None;
                }
                _ => return self.fields[self.focus].update(msg),
            }
        }

        match self.fields.iter_mut().find(|f| f.state().owns_message(&msg)) {
            Some(field) => field.update(msg),
            None => None,
        }
    }

    fn view(&self) -> String {
        let mut out = String::from("Job application\n\n");
        for field in &self.fields {
            out.push_str(&field.view());
            out.push_str("\n\n");
        }
        if let Some(status) = &self.status {
            out.push_str(status);
            out.push('\n');
        }
        if let Some(summary) = &self.summary {
            for line in summary {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        let keys = self.fields[self.focus].keymap();
        out.push_str(&help_line(&keys.short_help()));
        out.push_str(" • tab next field • ctrl+s submit • ctrl+c quit");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combobox::{SelectionValue, ThemeVariant};
    use tea_core::KeyType;
    use tea_core::simulator::ProgramSimulator;

    fn offline_app() -> App {
        let config = DemoConfig {
            offline: true,
            theme: ThemeVariant::Plain,
            ..DemoConfig::default()
        };
        App::new(&config).unwrap()
    }

    fn key(t: KeyType) -> Message {
        Message::new(KeyMsg::from_type(t))
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = offline_app();
        assert!(app.fields()[0].is_focused());
        app.update(key(KeyType::Tab));
        assert_eq!(app.focused(), 1);
        assert!(!app.fields()[0].is_focused());
        assert!(app.fields()[1].is_focused());
        app.update(key(KeyType::ShiftTab));
        app.update(key(KeyType::ShiftTab));
        assert_eq!(app.focused(), 3);
    }

    #[test]
    fn test_submit_requires_department() {
        let mut app = offline_app();
        app.update(Message::new(KeyMsg::ctrl('s')));
        assert_eq!(app.fields()[1].error(), Some("Department is required"));
        assert!(app.summary().is_none());
        assert!(app.view().contains("Department is required"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_form_flow() {
        let mut sim = ProgramSimulator::new(offline_app());

        // Product search against the offline catalogue.
        for c in "macb".chars() {
            sim.send(Message::new(KeyMsg::from_char(c)));
        }
        sim.settle().await;
        assert_eq!(sim.model().fields()[0].ghost().as_deref(), Some("ook Pro"));
        sim.send(key(KeyType::Tab)); // accepts the ghost
        sim.send(key(KeyType::Tab)); // moves on
        // Department: first option.
        sim.send(key(KeyType::Down));
        sim.send(key(KeyType::Enter));
        sim.settle().await;
        sim.send(Message::new(KeyMsg::ctrl('s')));
        sim.settle().await;

        let app = sim.model();
        assert_eq!(app.focused(), 1);
        assert_eq!(
            app.fields()[1].value(),
            SelectionValue::Single("eng".into())
        );
        let summary = app.summary().unwrap();
        assert_eq!(summary[0], "Product: MacBook Pro");
        assert_eq!(summary[1], "Department: Engineering");
        assert_eq!(summary[2], "Office: (none)");
    }
}
