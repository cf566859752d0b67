//! Prompt templates for the diagnosis and suggestion calls. Placeholders
//! use `{name}` and are filled with plain string replacement.

pub const EDITAL_EVALUATION_TEMPLATE: &str = "\
Você é um avaliador de projetos culturais. Analise este projeto:

PROJETO:
{projeto}

Considerando estes CRITÉRIOS DO EDITAL:
{edital}

Forneça uma análise detalhada com:
1. Adequação aos critérios (✅/❌)
2. Pontos fortes
3. Pontos fracos
4. Sugestões de melhoria
5. Nota estimada (0-100)

ANÁLISE:";

pub const SELECTED_COMPARISON_TEMPLATE: &str = "\
Analise este projeto em comparação com projetos selecionados em editais anteriores:

PROJETOS SELECIONADOS ANTERIORES:
{selecionados}

NOVO PROJETO:
{projeto}

Forneça:
1. Semelhanças com projetos aprovados
2. Diferenças notáveis
3. Fatores competitivos
4. Recomendações para aumentar chances

Análise comparativa:";

pub const SUGGESTIONS_TEMPLATE: &str = "\
Você é um consultor de projetos culturais. Leia o projeto abaixo e proponha melhorias pontuais no texto.

PROJETO:
{projeto}

Gere até 5 sugestões de melhoria. Para cada sugestão, use EXATAMENTE o seguinte formato, com cada campo em uma única linha:

[SUGESTÃO N]
Trecho Original: <trecho exato copiado do texto do projeto>
Proposta de Mudança: <resumo breve da mudança>
Novo Texto: <texto que substitui o trecho original>

Numere as sugestões sequencialmente a partir de 1. Não escreva nada fora desse formato.";
