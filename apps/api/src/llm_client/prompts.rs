// Shared prompt constants and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt for every free-text generation call. Keeps the model in
/// Brazilian Portuguese and in the cultural-grant consulting register.
pub const CULTURAL_ADVISOR_SYSTEM: &str = "Você é um consultor especializado em \
    elaboração de projetos culturais e editais de fomento à cultura no Brasil. \
    Escreva sempre em português do Brasil, com linguagem clara e objetiva, \
    adequada a formulários de editais públicos.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Você é um assistente preciso e estruturado. \
    Responda APENAS com JSON válido. \
    Não inclua nenhum texto fora do objeto JSON. \
    Não use cercas de código markdown. \
    Não inclua explicações ou desculpas.";

/// Instruction block prepended to a generation prompt when the project
/// already has a stored diagnosis. Replace `{diagnostico}` before sending.
pub const DIAGNOSIS_CONTEXT_TEMPLATE: &str = "Considere o seguinte diagnóstico ao gerar o documento:

{diagnostico}

Adapte o conteúdo conforme necessário.

";
