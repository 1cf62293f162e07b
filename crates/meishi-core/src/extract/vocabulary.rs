//! Keyword tables used by the field extractor.
//!
//! A `Vocabulary` is plain data handed to `FieldExtractor::new`; the default
//! targets Japanese and English cards. Other locales can be supplied through
//! configuration without touching the extractor.

use serde::{Deserialize, Serialize};

/// Keyword and label tables for field extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Legal-entity markers identifying a company line.
    pub company_keywords: Vec<String>,
    /// Job titles that are never part of a name.
    pub title_keywords: Vec<String>,
    /// Endings of department lines ("営業部"); only applied to lines of three
    /// or more characters so short surnames are kept.
    pub department_suffixes: Vec<String>,
    /// Region names that mark an address line.
    pub regions: Vec<String>,
    /// Labels preceding a landline number.
    pub phone_labels: Vec<String>,
    /// Labels preceding a fax number.
    pub fax_labels: Vec<String>,
    /// Labels preceding a mobile number.
    pub mobile_labels: Vec<String>,
    /// Labels preceding an email address.
    pub email_labels: Vec<String>,
    /// Leading digits of mobile numbers.
    pub mobile_prefixes: Vec<String>,
    /// Top-level domains accepted for scheme-less websites.
    pub website_tlds: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The 47 prefectures of Japan.
pub const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

impl Vocabulary {
    /// Tables for Japanese and English business cards.
    pub fn japanese() -> Self {
        Self {
            company_keywords: strings(&[
                "株式会社", "有限会社", "合同会社", "合資会社", "合名会社",
                "一般社団法人", "社団法人", "一般財団法人", "財団法人", "医療法人",
                "社会福祉法人", "学校法人", "特定非営利活動法人", "NPO法人", "(株)",
                "（株）", "㈱", "(有)", "（有）", "㈲", "Co.", "Ltd.", "Inc.",
                "Corporation", "Corp.", "K.K.", "LLC", "GK",
            ]),
            title_keywords: strings(&[
                "代表取締役", "取締役", "社長", "会長", "部長", "課長", "係長", "主任",
                "室長", "支店長", "所長", "店長", "理事", "顧問", "営業所", "支店", "本社",
                "President", "Vice President", "CEO", "CTO", "CFO", "COO", "Director",
                "Manager", "Engineer", "Sales", "Chief", "Officer", "Representative",
                "Consultant", "Designer", "Founder", "PRESIDENT", "DIRECTOR", "MANAGER",
                "ENGINEER", "SALES",
            ]),
            department_suffixes: strings(&["部", "課", "室", "局", "係", "グループ"]),
            regions: strings(&PREFECTURES),
            phone_labels: strings(&["TEL", "Tel", "電話番号", "電話", "Phone", "代表"]),
            fax_labels: strings(&["FAX", "Fax", "ファックス", "ファクス"]),
            mobile_labels: strings(&["Mobile", "MOBILE", "Mob", "携帯", "Cell"]),
            email_labels: strings(&["E-mail", "Email", "EMAIL", "Mail", "メール"]),
            mobile_prefixes: strings(&["070", "080", "090"]),
            website_tlds: strings(&[
                "co.jp", "or.jp", "ne.jp", "ac.jp", "go.jp", "com", "jp", "net", "org",
                "info", "biz", "io",
            ]),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::japanese()
    }
}
