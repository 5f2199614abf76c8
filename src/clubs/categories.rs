//! Activity keyword groups used to relate a query to clubs that never
//! mention the query's exact words.

/// Bare club/team terms, longest first.
pub const GENERIC_TERMS: &[&str] = &[
    "部活動", "部活", "同好会", "サークル", "クラブ", "チーム", "circle", "club", "team", "部",
];

const BALL_SPORTS: &[&str] = &[
    "サッカー", "フットサル", "野球", "ソフトボール", "テニス", "バスケ", "バレー",
    "バドミントン", "ラグビー", "卓球", "ハンドボール", "soccer", "baseball", "tennis",
    "basketball", "volleyball",
];

const ATHLETICS: &[&str] = &["陸上", "水泳", "トライアスロン", "自転車", "マラソン", "running"];

const MARTIAL_ARTS: &[&str] = &[
    "柔道", "剣道", "空手", "弓道", "合気道", "少林寺", "ボクシング", "なぎなた",
];

const MUSIC: &[&str] = &[
    "軽音", "バンド", "吹奏楽", "合唱", "オーケストラ", "管弦楽", "ジャズ", "三線",
    "エイサー", "音楽", "music", "band",
];

const ARTS: &[&str] = &[
    "美術", "写真", "茶道", "書道", "華道", "文芸", "漫画", "アニメ", "演劇", "映画", "ダンス",
];

const OUTDOOR: &[&str] = &[
    "ダイビング", "サーフィン", "ヨット", "カヌー", "登山", "ワンダーフォーゲル", "釣り", "海",
];

const VOLUNTEER: &[&str] = &["ボランティア", "国際交流", "留学生", "地域", "volunteer"];

const TECH: &[&str] = &[
    "プログラミング", "ロボット", "天文", "電子", "ゲーム", "esports", "programming",
];

/// Every keyword group.
pub const CATEGORY_GROUPS: &[&[&str]] = &[
    BALL_SPORTS,
    ATHLETICS,
    MARTIAL_ARTS,
    MUSIC,
    ARTS,
    OUTDOOR,
    VOLUNTEER,
    TECH,
];

/// Groups with at least one keyword in the (folded, lower-cased) query.
pub fn touched_groups(query: &str) -> Vec<&'static [&'static str]> {
    CATEGORY_GROUPS
        .iter()
        .copied()
        .filter(|group| group.iter().any(|k| query.contains(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_groups() {
        let groups = touched_groups("バンドかダンスがしたい");
        assert_eq!(groups.len(), 2);
        assert!(groups[0].contains(&"軽音"));
        assert!(groups[1].contains(&"写真"));
        assert!(touched_groups("サークルある?").is_empty());
    }
}
