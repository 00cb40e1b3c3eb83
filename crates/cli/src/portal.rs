//! Interactive terminal front end for the quotation workflow.
//!
//! The portal owns no workflow state of its own; it renders whatever the
//! session exposes and translates key presses into controller calls. Input
//! and output are injected so the whole loop can be driven by a script in
//! tests.

use std::io::{BufRead, Write};

use anyhow::Result;

use quotedesk_core::domain::field::{FieldDescriptor, FieldKind};
use quotedesk_core::domain::product::Product;
use quotedesk_core::domain::quotation::Quotation;
use quotedesk_core::workflow::controller::WorkflowController;
use quotedesk_core::workflow::session::{LoginOutcome, ViewEffect};

use crate::watermark::watermark_line;

pub struct Portal {
    controller: WorkflowController,
    watermark: String,
}

enum DetailAction {
    Calculate,
    Edit,
    Back,
    Quit,
}

impl Portal {
    pub fn new(controller: WorkflowController, watermark: String) -> Self {
        Self { controller, watermark }
    }

    pub async fn run(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<()> {
        writeln!(output, "Quotedesk Quotation Portal")?;
        writeln!(output, "{}", watermark_line(&self.watermark))?;
        writeln!(output)?;
        writeln!(output, "Loading...")?;
        self.controller.start().await?;

        if !self.login_loop(input, output).await? {
            return Ok(());
        }
        self.list_loop(input, output).await
    }

    /// Prompt for credentials until a pair is accepted. Returns false when
    /// the input stream ends first.
    async fn login_loop(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<bool> {
        loop {
            let Some(email) = prompt(input, output, "Email: ")? else {
                return Ok(false);
            };
            let Some(password) = prompt(input, output, "Password: ")? else {
                return Ok(false);
            };

            match self.controller.login(&email, &password).await? {
                LoginOutcome::Authenticated => {
                    writeln!(output, "Welcome, {email}.")?;
                    writeln!(output)?;
                    return Ok(true);
                }
                LoginOutcome::Rejected => {
                    if let Some(message) = self.controller.session().login_error() {
                        writeln!(output, "{message}")?;
                    }
                }
                LoginOutcome::Superseded => {}
            }
        }
    }

    async fn list_loop(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<()> {
        loop {
            if let Some(message) = self.controller.session().products_error() {
                writeln!(output, "{message}")?;
                let Some(choice) = prompt(input, output, "[r]etry or [q]uit: ")? else {
                    return Ok(());
                };
                match choice.as_str() {
                    "r" => {
                        self.controller.ensure_products().await?;
                        continue;
                    }
                    _ => return Ok(()),
                }
            }

            write!(output, "{}", render_products(self.controller.session().products()))?;
            let Some(choice) =
                prompt(input, output, "Select a product (number) or [q]uit: ")?
            else {
                return Ok(());
            };
            if choice == "q" {
                return Ok(());
            }

            let selected = choice
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| self.controller.session().products().get(index).cloned());
            let Some(product) = selected else {
                writeln!(output, "No such product.")?;
                continue;
            };

            writeln!(output)?;
            writeln!(output, "{} ({})", product.name, product.code)?;
            if !product.description.is_empty() {
                writeln!(output, "{}", product.description)?;
            }
            self.controller.select_product(product).await?;
            if !self.detail_loop(input, output).await? {
                return Ok(());
            }
        }
    }

    /// One product detail visit. Returns false when the user quits outright,
    /// true when they navigate back to the list.
    async fn detail_loop(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<bool> {
        loop {
            if let Some(message) = self.controller.session().fields_error() {
                writeln!(output, "{message}")?;
                let Some(choice) = prompt(input, output, "[r]etry or [b]ack: ")? else {
                    return Ok(false);
                };
                match choice.as_str() {
                    "r" => {
                        self.controller.reload_fields().await?;
                        continue;
                    }
                    _ => {
                        self.controller.back_to_products()?;
                        return Ok(true);
                    }
                }
            }

            if self.controller.session().form_values().values().all(String::is_empty) {
                if !self.fill_form(input, output)? {
                    return Ok(false);
                }
            }

            match self.detail_action(input, output)? {
                Some(DetailAction::Calculate) => {
                    let effects = self.controller.calculate().await?;
                    if effects.contains(&ViewEffect::RevealQuotation) {
                        if let Some(quotation) = self.controller.session().quotation() {
                            write!(output, "{}", render_quotation(quotation))?;
                        }
                    } else if let Some(message) =
                        self.controller.session().calculation_error()
                    {
                        writeln!(output, "{message}")?;
                    }
                }
                Some(DetailAction::Edit) => {
                    if !self.fill_form(input, output)? {
                        return Ok(false);
                    }
                }
                Some(DetailAction::Back) => {
                    self.controller.back_to_products()?;
                    return Ok(true);
                }
                Some(DetailAction::Quit) | None => return Ok(false),
            }
        }
    }

    fn detail_action(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<Option<DetailAction>> {
        loop {
            let Some(choice) =
                prompt(input, output, "[c]alculate, [e]dit, [b]ack, or [q]uit: ")?
            else {
                return Ok(None);
            };
            match choice.as_str() {
                "c" => return Ok(Some(DetailAction::Calculate)),
                "e" => return Ok(Some(DetailAction::Edit)),
                "b" => return Ok(Some(DetailAction::Back)),
                "q" => return Ok(Some(DetailAction::Quit)),
                _ => writeln!(output, "Unrecognized choice.")?,
            }
        }
    }

    /// Walk every field in definition order and store the raw answers.
    /// Returns false on end of input.
    fn fill_form(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<bool> {
        let fields: Vec<FieldDescriptor> = self.controller.session().fields().to_vec();
        for field in fields {
            let answer = match field.kind() {
                FieldKind::Numeric => prompt(input, output, &format!("{}: ", field.name))?,
                FieldKind::Choice => {
                    for (index, option) in field.options.iter().enumerate() {
                        writeln!(output, "  {}. {option}", index + 1)?;
                    }
                    let raw =
                        prompt(input, output, &format!("{} (number or text): ", field.name))?;
                    raw.map(|raw| resolve_choice(&field.options, raw))
                }
            };
            let Some(answer) = answer else {
                return Ok(false);
            };
            self.controller.edit_field(&field.name, &answer)?;
        }
        Ok(true)
    }
}

/// A bare option number picks from the list; anything else is taken verbatim.
fn resolve_choice(options: &[String], raw: String) -> String {
    raw.parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| options.get(index).cloned())
        .unwrap_or(raw)
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products available.\n".to_string();
    }

    let mut out = String::from("Products:\n");
    for (index, product) in products.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} [{}] {}\n",
            index + 1,
            product.name,
            product.code,
            product.description
        ));
    }
    out
}

fn render_quotation(quotation: &Quotation) -> String {
    let mut out = String::from("\nQuotation\n");
    if let Some(headline) = quotation.formatted_net_total() {
        out.push_str(&format!("Net Total: {headline}\n"));
    }
    for (key, value) in quotation.detail_lines() {
        out.push_str(&format!("  {key}: {value}\n"));
    }
    out
}
