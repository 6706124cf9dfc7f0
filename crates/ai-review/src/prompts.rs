//! Prompt construction for the semantic analyzer
//!
//! Both prompts pin the model to a JSON output shape; the parser still
//! treats that shape as a suggestion, not a guarantee.

use shared_types::{DocumentContent, ReviewFinding};

/// Max document characters embedded in a validation prompt
const VALIDATION_TEXT_LIMIT: usize = 3000;

/// System role for the full semantic analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = "你是一位专业的行政处罚决定书审查专家，具有丰富的执法文书审查经验。请客观准确地指出问题，避免过度严格或误报。";

/// System role for rule-verdict validation
pub const VALIDATION_SYSTEM_PROMPT: &str = "你是行政处罚决定书审查专家，需要判断规则检测的问题是否为误报。如果文书中确实包含相关内容，应判定为误报。";

/// Options controlling analysis emphasis
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub strict_mode: bool,
    pub enable_semantic_check: bool,
    pub enable_language_check: bool,
    pub enable_logic_check: bool,
}

impl AnalysisOptions {
    pub fn all_enabled() -> Self {
        Self {
            strict_mode: false,
            enable_semantic_check: true,
            enable_language_check: true,
            enable_logic_check: true,
        }
    }
}

/// User prompt for the full review of one document
pub fn build_analysis_prompt(content: &DocumentContent, options: &AnalysisOptions) -> String {
    let strict_note = if options.strict_mode {
        "请特别严格地审查所有细节问题。"
    } else {
        ""
    };

    format!(
        r#"你是一位资深的行政处罚决定书审查专家，请仔细审查以下文书，指出存在的问题并给出改进建议。

**重要原则**：
1. 基于文书的实际内容进行判断，不要因为格式或表述方式不同而误报
2. 如果文书中明确包含某项内容（如"罚款300元"），即使表述简洁，也应认为已满足要求
3. 只有真正缺失关键信息或存在明显错误时才报告问题
4. 给出的建议必须具体可操作{strict_note}

**重点关注**：
- 必备要素完整性：
  * 当事人信息(根据"当事人:"后的名称自动判断类型)：
    - 判断规则：如果是人名则为个人,如果包含"公司、企业、商店、厂、中心、合作社、个体工商户"等则为单位
    - 个人当事人必需信息：姓名、住所(住址)、身份证号、联系电话
    - 单位当事人必需信息：名称、住所(住址)、统一社会信用代码、单位负责人信息(姓名、身份证号、联系方式)
    - 注意："法定代表人(负责人、经营者)"是正确表述,括号内是不同类型单位的不同称呼,不要报告此类格式问题
    - 不要报告"类型认定不清",而应根据判断结果直接指出缺失的具体信息要素
  * 违法事实、证据、法律依据、处罚决定、救济告知是否完整
- 格式规范性：
  * 信息字段不应有多余空格(如"统一社会信用代码 : 123"应为"统一社会信用代码:123")
  * 空白字段应删除(如"其他联系方式:"后无内容应删除整行)
  * 标点符号使用规范
- 逻辑一致性：事实、证据、法律依据、处罚决定之间是否对应，前后是否矛盾
- 法律准确性：引用的法律条款是否准确，处罚幅度是否合理
- 程序规范性：陈述申辩、听证、复议诉讼告知等程序是否齐全

**文书内容**：
{text}

请按以下JSON格式输出分析结果：

```json
{{
  "issues": [
    {{
      "type": "critical|warning|info",
      "category": "当事人信息|违法事实与证据|处罚依据与决定|履行与权利告知|格式与语言规范|逻辑一致性",
      "title": "问题简要标题",
      "description": "具体问题描述",
      "location": "问题位置",
      "suggestion": "改进建议",
      "confidence": 85
    }}
  ],
  "summary": {{
    "languageScore": 85,
    "logicScore": 85,
    "overallAssessment": "整体评价"
  }}
}}
```

如果没有发现问题，issues数组可以为空。评分标准：90分以上优秀，80-89分良好，70-79分合格，70分以下需要改进。"#,
        strict_note = strict_note,
        text = content.text,
    )
}

/// User prompt asking for keep/discard verdicts on rule findings
pub fn build_validation_prompt(content: &DocumentContent, findings: &[ReviewFinding]) -> String {
    let issues_description = findings
        .iter()
        .enumerate()
        .map(|(index, finding)| {
            format!(
                "{}. [{}] {}\n   问题：{}\n   位置：{}",
                index + 1,
                finding.id,
                finding.title,
                finding.description,
                finding.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let text: String = content.text.chars().take(VALIDATION_TEXT_LIMIT).collect();
    let ellipsis = if content.text.chars().count() > VALIDATION_TEXT_LIMIT {
        "..."
    } else {
        ""
    };

    format!(
        r#"你是行政处罚决定书审查专家，需要复核以下规则检测出的问题是否为误报。

**重要原则**：
1. 如果文书中确实包含相关内容，即使表述方式不同，也应判定为误报
2. 只有真正缺失关键信息时才保留问题
3. 例如："罚款300元"和"罚款人民币300元"都是有效的

**文书内容**：
{text}{ellipsis}

**待复核的问题**：
{issues}

请对每个问题判断是否为误报，输出JSON格式：

```json
{{
  "validatedIssues": [
    {{
      "id": "问题ID",
      "verdict": "keep",
      "reason": "确实缺失XX信息"
    }},
    {{
      "id": "问题ID",
      "verdict": "discard",
      "reason": "文书中已包含XX内容"
    }}
  ]
}}
```

verdict只能是"keep"(保留)或"discard"(误报)。"#,
        text = text,
        ellipsis = ellipsis,
        issues = issues_description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{IssueSource, Severity};

    fn finding(id: &str) -> ReviewFinding {
        ReviewFinding {
            id: id.to_string(),
            source: IssueSource::Rules,
            severity: Severity::Warning,
            category: "正文部分".to_string(),
            title: "当事人信息完整性".to_string(),
            description: "个人当事人未提供身份证号码".to_string(),
            location: "当事人基本信息段".to_string(),
            suggestion: "补充身份证号码".to_string(),
            confidence: 95,
        }
    }

    #[test]
    fn analysis_prompt_embeds_document_text() {
        let content = DocumentContent::from_text("当事人：张三。决定罚款300元。");
        let prompt = build_analysis_prompt(&content, &AnalysisOptions::all_enabled());
        assert!(prompt.contains("当事人：张三。决定罚款300元。"));
        assert!(prompt.contains("languageScore"));
        assert!(!prompt.contains("请特别严格"));
    }

    #[test]
    fn strict_mode_adds_note() {
        let content = DocumentContent::from_text("内容");
        let options = AnalysisOptions {
            strict_mode: true,
            ..AnalysisOptions::all_enabled()
        };
        let prompt = build_analysis_prompt(&content, &options);
        assert!(prompt.contains("请特别严格地审查所有细节问题。"));
    }

    #[test]
    fn validation_prompt_enumerates_findings_with_ids() {
        let content = DocumentContent::from_text("当事人：张三。");
        let findings = vec![finding("party_information_completeness_1")];
        let prompt = build_validation_prompt(&content, &findings);
        assert!(prompt.contains("1. [party_information_completeness_1] 当事人信息完整性"));
        assert!(prompt.contains("validatedIssues"));
        assert!(!prompt.contains("..."));
    }

    #[test]
    fn validation_prompt_truncates_long_documents() {
        let content = DocumentContent::from_text("长".repeat(4000));
        let findings = vec![finding("rule_1")];
        let prompt = build_validation_prompt(&content, &findings);
        assert!(prompt.contains("..."));
        let embedded: String = "长".repeat(3001);
        assert!(!prompt.contains(&embedded));
    }
}
