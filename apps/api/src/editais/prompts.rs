//! Prompt template for extracting structured metadata from edital text.

pub const EDITAL_INFO_TEMPLATE: &str = "\
Analise o seguinte texto de edital e extraia as seguintes informações em formato estruturado:

1. Data de inscrição (formato DD/MM/YYYY)
2. Categorias de projetos (lista de categorias disponíveis)
3. Textos que precisam ser enviados (objetivos, justificativas, etc.)
4. Documentos que devem ser enviados (anexos, declarações, etc.)

Texto do edital:
{edital}

Retorne apenas um objeto JSON com as seguintes chaves:
- data_inscricao: string no formato DD/MM/YYYY
- categorias: lista de strings
- textos_requeridos: lista de strings
- documentos_requeridos: lista de strings

Se alguma informação não for encontrada, retorne uma lista vazia ou string vazia.";
