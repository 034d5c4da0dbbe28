// Location lookup tables for top-N keys and the world map
//
// Keys missing from a table fall back to the raw key at the call site.

/// (ISO 3166 code, region name in the world map geometry, display name)
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("CN", "China", "中国大陆"),
    ("HK", "Hong Kong", "中国香港"),
    ("MO", "Macao", "中国澳门"),
    ("TW", "Taiwan", "中国台湾"),
    ("US", "United States", "美国"),
    ("CA", "Canada", "加拿大"),
    ("MX", "Mexico", "墨西哥"),
    ("BR", "Brazil", "巴西"),
    ("AR", "Argentina", "阿根廷"),
    ("CL", "Chile", "智利"),
    ("CO", "Colombia", "哥伦比亚"),
    ("PE", "Peru", "秘鲁"),
    ("GB", "United Kingdom", "英国"),
    ("IE", "Ireland", "爱尔兰"),
    ("FR", "France", "法国"),
    ("DE", "Germany", "德国"),
    ("NL", "Netherlands", "荷兰"),
    ("BE", "Belgium", "比利时"),
    ("CH", "Switzerland", "瑞士"),
    ("AT", "Austria", "奥地利"),
    ("IT", "Italy", "意大利"),
    ("ES", "Spain", "西班牙"),
    ("PT", "Portugal", "葡萄牙"),
    ("SE", "Sweden", "瑞典"),
    ("NO", "Norway", "挪威"),
    ("FI", "Finland", "芬兰"),
    ("DK", "Denmark", "丹麦"),
    ("PL", "Poland", "波兰"),
    ("CZ", "Czech Rep.", "捷克"),
    ("HU", "Hungary", "匈牙利"),
    ("RO", "Romania", "罗马尼亚"),
    ("GR", "Greece", "希腊"),
    ("UA", "Ukraine", "乌克兰"),
    ("RU", "Russia", "俄罗斯"),
    ("TR", "Turkey", "土耳其"),
    ("IL", "Israel", "以色列"),
    ("SA", "Saudi Arabia", "沙特阿拉伯"),
    ("AE", "United Arab Emirates", "阿联酋"),
    ("IR", "Iran", "伊朗"),
    ("EG", "Egypt", "埃及"),
    ("ZA", "South Africa", "南非"),
    ("NG", "Nigeria", "尼日利亚"),
    ("KE", "Kenya", "肯尼亚"),
    ("IN", "India", "印度"),
    ("PK", "Pakistan", "巴基斯坦"),
    ("BD", "Bangladesh", "孟加拉国"),
    ("JP", "Japan", "日本"),
    ("KR", "Korea", "韩国"),
    ("KP", "Dem. Rep. Korea", "朝鲜"),
    ("MN", "Mongolia", "蒙古"),
    ("KZ", "Kazakhstan", "哈萨克斯坦"),
    ("SG", "Singapore", "新加坡"),
    ("MY", "Malaysia", "马来西亚"),
    ("TH", "Thailand", "泰国"),
    ("VN", "Vietnam", "越南"),
    ("PH", "Philippines", "菲律宾"),
    ("ID", "Indonesia", "印度尼西亚"),
    ("MM", "Myanmar", "缅甸"),
    ("KH", "Cambodia", "柬埔寨"),
    ("LA", "Lao PDR", "老挝"),
    ("AU", "Australia", "澳大利亚"),
    ("NZ", "New Zealand", "新西兰"),
];

/// Codes some upstream records use that differ from ISO 3166.
const MAP_ALIASES: &[(&str, &str)] = &[("UK", "英国"), ("EL", "希腊"), ("XK", "科索沃")];

const PROVINCES: &[(&str, &str)] = &[
    ("Beijing", "北京"),
    ("Tianjin", "天津"),
    ("Hebei", "河北"),
    ("Shanxi", "山西"),
    ("Inner Mongolia", "内蒙古"),
    ("Liaoning", "辽宁"),
    ("Jilin", "吉林"),
    ("Heilongjiang", "黑龙江"),
    ("Shanghai", "上海"),
    ("Jiangsu", "江苏"),
    ("Zhejiang", "浙江"),
    ("Anhui", "安徽"),
    ("Fujian", "福建"),
    ("Jiangxi", "江西"),
    ("Shandong", "山东"),
    ("Henan", "河南"),
    ("Hubei", "湖北"),
    ("Hunan", "湖南"),
    ("Guangdong", "广东"),
    ("Guangxi", "广西"),
    ("Hainan", "海南"),
    ("Chongqing", "重庆"),
    ("Sichuan", "四川"),
    ("Guizhou", "贵州"),
    ("Yunnan", "云南"),
    ("Tibet", "西藏"),
    ("Shaanxi", "陕西"),
    ("Gansu", "甘肃"),
    ("Qinghai", "青海"),
    ("Ningxia", "宁夏"),
    ("Xinjiang", "新疆"),
    ("Hong Kong", "香港"),
    ("Macao", "澳门"),
    ("Taiwan", "台湾"),
];

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, _, name)| *name)
}

pub fn province_name(key: &str) -> Option<&'static str> {
    PROVINCES
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, name)| *name)
}

/// Region name the map renderer matches on, after its name map is applied.
pub fn map_region_name(code: &str) -> String {
    country_name(code)
        .or_else(|| {
            MAP_ALIASES
                .iter()
                .find(|(c, _)| c.eq_ignore_ascii_case(code))
                .map(|(_, name)| *name)
        })
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

/// Geometry name -> display name, handed to the map renderer.
pub fn world_name_map() -> impl Iterator<Item = (&'static str, &'static str)> {
    COUNTRIES.iter().map(|(_, geometry, name)| (*geometry, *name))
}
