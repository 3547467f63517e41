//! Colored terminal rendering of a trained ruleset and its test measures.
//!
//! Uses a small `ansi::Palette` helper (color on/off via a flag, no external
//! ANSI crate).

use crate::model::{ClassMeasures, RuleBasedModel};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Render a trained model as an ordered IF/THEN list, one rule per line.
pub fn print_model(model: &RuleBasedModel, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Ruleset ({} rules)", model.rules.len()), ansi::CYAN)));
    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));

    for (idx, rule) in model.rules.iter().enumerate() {
        let class_name = model.schema[0].domain().and_then(|d| d.get(rule.consequent)).cloned().unwrap_or_else(|| rule.consequent.to_string());

        if rule.is_default() {
            println!("  {} {} {}", palette.dim(format!("{idx:>2}.")), palette.dim("default ⇒"), palette.paint(&class_name, ansi::YELLOW));
            continue;
        }

        let conds: Vec<String> = rule
            .antecedents
            .iter()
            .map(|a| {
                let attr = &model.schema[a.att_idx()];
                match a {
                    crate::antecedent::Antecedent::Discrete { target, .. } => {
                        let label = attr.domain().and_then(|d| d.get(*target)).cloned().unwrap_or_else(|| target.to_string());
                        format!("{} = {}", attr.name(), label)
                    }
                    crate::antecedent::Antecedent::Continuous { split_point, direction, .. } => {
                        let op = match direction {
                            crate::antecedent::Direction::Le => "<=",
                            crate::antecedent::Direction::Ge => ">=",
                        };
                        format!("{} {} {}", attr.name(), op, split_point)
                    }
                }
            })
            .collect();

        println!(
            "  {} {} {} {}",
            palette.dim(format!("{idx:>2}.")),
            palette.paint(conds.join(" AND "), ansi::BLUE),
            palette.dim("⇒"),
            palette.paint(&class_name, ansi::YELLOW),
        );
    }
    println!();
}

/// Render per-class precision/recall/F1 as a small table.
pub fn print_measures(schema_domain: &[String], measures: &[ClassMeasures], color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint("━━━ Test Measures ━━━", ansi::GRAY));
    println!("  {:<12} {:>10} {:>10} {:>10}", "class", "precision", "recall", "f1");
    for m in measures {
        let name = schema_domain.get(m.class).cloned().unwrap_or_else(|| m.class.to_string());
        println!(
            "  {:<12} {:>10} {:>10} {:>10}",
            name,
            palette.paint(format!("{:.3}", m.precision()), ansi::GREEN),
            palette.paint(format!("{:.3}", m.recall()), ansi::GREEN),
            palette.paint(format!("{:.3}", m.f1()), ansi::GREEN),
        );
    }
    println!();
}
