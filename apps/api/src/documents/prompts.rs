//! One prompt template per document kind. All templates take the project
//! text through the `{texto}` placeholder; the diagnosis context block,
//! when present, is prepended by the composer.

pub const RESUMO_EXECUTIVO_TEMPLATE: &str = "\
Gere um resumo conciso (150-200 palavras) do seguinte projeto, destacando:
- Objetivos principais
- Público-alvo
- Metodologia
- Impacto cultural

Use linguagem clara e objetiva.

Projeto:
{texto}

Resumo:";

pub const ORCAMENTO_COMPLETO_TEMPLATE: &str = "\
Gere um orçamento detalhado para o projeto abaixo, dividido em:
- Materiais e suprimentos
- Honorários dos profissionais
- Infraestrutura e logística
- Outras despesas
- Total estimado

Projeto:
{texto}";

pub const CRONOGRAMA_DETALHADO_TEMPLATE: &str = "\
Crie um cronograma detalhado com base nas fases:
- Planejamento
- Execução
- Finalização e Avaliação

Indique o tempo previsto para cada etapa.

Projeto:
{texto}";

pub const OBJETIVOS_SMART_TEMPLATE: &str = "\
Reformule os objetivos do projeto no formato SMART:
- Específicos
- Mensuráveis
- Atingíveis
- Relevantes
- Temporais

Projeto:
{texto}";

pub const JUSTIFICATIVA_TECNICA_TEMPLATE: &str = "\
Gere uma justificativa técnica clara e convincente para o projeto, abordando:
- Motivações
- Contribuições culturais
- Relevância social e técnica

Projeto:
{texto}";

pub const ETAPAS_DE_TRABALHO_TEMPLATE: &str = "\
Descreva as etapas do projeto, organizadas em:
- Planejamento
- Execução
- Monitoramento
- Encerramento

Projeto:
{texto}";

pub const FICHA_TECNICA_TEMPLATE: &str = "\
Gere a ficha técnica do projeto com:
- Nome das funções
- Atuação/responsabilidade
- Tipo de vínculo (contrato, parceiro, interno)

Projeto:
{texto}";

pub const PLANO_DE_DIVULGACAO_TEMPLATE: &str = "\
Elabore um plano de divulgação para o projeto, contemplando:
- Canais de comunicação (redes sociais, imprensa, parcerias)
- Peças e materiais de divulgação
- Cronograma das ações de comunicação
- Público a ser alcançado em cada canal

Projeto:
{texto}";
