use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use haggle_core::framing::{FramedMessage, MessageRenderer, PlainRenderer, ToneId};

/// A buyer personality: the fixed phrases woven into rendered messages.
/// Personas only phrase offers; they never touch the numeric engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub catchphrases: Vec<String>,
}

impl Persona {
    pub fn composed() -> Self {
        Self {
            name: "composed".to_string(),
            catchphrases: vec![
                "Let us reach an agreement both our names will be proud to carry.".to_string(),
                "True success is when both of us walk away believing we won.".to_string(),
                "Consider this a foundation for our partnership, not a discount.".to_string(),
            ],
        }
    }

    pub fn insider() -> Self {
        Self {
            name: "insider".to_string(),
            catchphrases: vec![
                "Market insiders are closing deals at lower rates.".to_string(),
                "I have other suppliers lined up.".to_string(),
                "This is my final serious offer.".to_string(),
            ],
        }
    }

    fn catchphrase_for(&self, framed: &FramedMessage) -> &str {
        if self.catchphrases.is_empty() {
            return "";
        }
        // Deterministic rotation keyed off the framing, not an RNG.
        let index = framed.emphasized_terms.len() % self.catchphrases.len();
        &self.catchphrases[index]
    }
}

/// Renders framed messages through per-tone tera templates. Falls back to
/// the plain renderer if a template ever fails to render.
pub struct PersonaRenderer {
    persona: Persona,
    templates: Tera,
}

const ANCHORING_TEMPLATE: &str = "I'll begin with {{ price }}. It's a figure that respects the \
                                  market while leaving us room to build this together. \
                                  {{ catchphrase }}";
const BALANCED_TEMPLATE: &str = "{% if terms %}I understand your focus on {{ terms }}. \
                                 {% endif %}I believe {{ price }} reflects the true value for \
                                 both sides. {{ catchphrase }}";
const URGENCY_TEMPLATE: &str = "{% if terms %}You spoke of {{ terms }}, and I agree. \
                                {% endif %}{{ price }} is where this closes. Let us not lose \
                                time over what already feels inevitable. {{ catchphrase }}";
const CLOSING_TEMPLATE: &str = "{{ price }} is my closing number. {{ catchphrase }}";

impl PersonaRenderer {
    pub fn new(persona: Persona) -> Result<Self> {
        let mut templates = Tera::default();
        templates
            .add_raw_templates([
                (ToneId::Anchoring.as_str(), ANCHORING_TEMPLATE),
                (ToneId::Balanced.as_str(), BALANCED_TEMPLATE),
                (ToneId::Urgency.as_str(), URGENCY_TEMPLATE),
                (ToneId::Closing.as_str(), CLOSING_TEMPLATE),
            ])
            .context("persona templates failed to parse")?;

        Ok(Self { persona, templates })
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }
}

impl MessageRenderer for PersonaRenderer {
    fn render(&self, framed: &FramedMessage) -> String {
        let mut context = Context::new();
        context.insert("price", &framed.buyer_price.to_string());
        context.insert("terms", &framed.emphasized_terms.join(", "));
        context.insert("catchphrase", self.persona.catchphrase_for(framed));

        self.templates
            .render(framed.tone.as_str(), &context)
            .unwrap_or_else(|_| PlainRenderer.render(framed))
    }
}
