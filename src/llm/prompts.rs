pub const CLASSIFICATION_PROMPT: &str = r#"Analise este comentário de cliente e responda APENAS com JSON válido:

{
  "sentimento": "Positivo" ou "Negativo" ou "Neutro",
  "categoria": "Bug" ou "Sugestão" ou "UI/UX" ou "Suporte",
  "resumo_curto": "resumo em uma frase"
}"#;

pub const SUMMARY_PROMPT: &str = "Como Analista de Produto, escreva um resumo executivo de 3-4 frases baseado nas estatísticas:";

pub const SUMMARY_INSTRUCTIONS: &str = "Destaque a tendência principal e problema mais urgente.";

#[derive(Debug, Clone)]
pub struct ClassificationRequest<'a> {
    pub comment: &'a str,
}

impl<'a> ClassificationRequest<'a> {
    pub fn new(comment: &'a str) -> Self {
        Self { comment }
    }

    pub fn to_prompt(&self) -> String {
        format!("{}\n\nComentário: \"{}\"\n", CLASSIFICATION_PROMPT, self.comment)
    }
}

pub fn summary_prompt(statistics: &str) -> String {
    format!("{}\n\n{}\n\n{}\n", SUMMARY_PROMPT, statistics.trim_end(), SUMMARY_INSTRUCTIONS)
}
