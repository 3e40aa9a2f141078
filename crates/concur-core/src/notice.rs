//! # Consent Notice Rendering
//!
//! The consent notice shown to data principals is a fixed set of localized
//! strings (one entry per supported language) plus a block of asset URLs.
//! [`render`] merges a stored collection point into every language entry so
//! a client can display the notice in any language without a second call.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::collection_point::{CollectionPointRecord, DataElement};

const MP3_LINK: &str = "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3";

/// Asset links shared by every language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeUrls {
    pub logo: &'static str,
    #[serde(rename = "speakIcon")]
    pub speak_icon: &'static str,
    #[serde(rename = "pauseIcon")]
    pub pause_icon: &'static str,
    #[serde(rename = "arrowIcon")]
    pub arrow_icon: &'static str,
    #[serde(rename = "mp3Link")]
    pub mp3_link: &'static str,
    pub dpar_link: &'static str,
    pub manage_consent_link: &'static str,
}

pub const URLS: NoticeUrls = NoticeUrls {
    logo: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTI2K4cwj_yTWk-rSebFdFF-tX1yMKE8o_Uwnk5H9GYkIoqSKHAvt-pYaB1dEQHK1paNNk&usqp=CAU",
    speak_icon: "https://www.svgrepo.com/show/165176/speaking.svg",
    pause_icon: "https://www.svgrepo.com/show/149256/pause-button.svg",
    arrow_icon: "https://cdn.icon-icons.com/icons2/2248/PNG/512/arrow_top_right_icon_135926.png",
    mp3_link: MP3_LINK,
    dpar_link: "https://www.instagram.com",
    manage_consent_link: "https://www.facebook.com",
};

/// Raw localized strings for one language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageStrings {
    pub language: &'static str,
    pub header: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub manage_consent_title: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub select_all: &'static str,
}

/// Supported notice languages, in display order.
pub const LANGUAGES: [LanguageStrings; 10] = [
    LanguageStrings {
        language: "english",
        header: "Consent Notice",
        title: "Digital Personal Data Protection Act 2023",
        description: "An Act to provide for the processing of digital personal data in a manner that recognises both the right of individuals to protect their personal data and theneed to process such personal data for lawful purposes and for matters connected therewith or incidental thereto",
        manage_consent_title: "Manage Consent Preferences",
        primary: "Accept",
        secondary: "Cancel",
        select_all: "Select All",
    },
    LanguageStrings {
        language: "hindi",
        header: "डेटा सहमति सूचना",
        title: "डिजिटल व्यक्तिगत डेटा संरक्षण अधिनियम 2023",
        description: "डिजिटल व्यक्तिगत डेटा के प्रसंस्करण के लिए इस तरह से प्रावधान करने के लिए एक अधिनियम जो व्यक्तियों के अपने व्यक्तिगत डेटा की सुरक्षा के अधिकार और कानूनी उद्देश्यों के लिए ऐसे व्यक्तिगत डेटा को संसाधित करने की आवश्यकता और उससे जुड़े या उसके प्रासंगिक मामलों को मान्यता देता है।",
        manage_consent_title: "सहमति प्राथमिकताएँ प्रबंधित करें",
        primary: "स्वीकार",
        secondary: "रद्द",
        select_all: "सबका चयन करें",
    },
    LanguageStrings {
        language: "tamil",
        header: "ஒப்புதல் அறிவிப்பு",
        title: "டிஜிட்டல் தனிப்பட்ட தரவுகளை பாதுகாப்பு சட்டம் 2023",
        description: "நபர்களின் தனிப்பட்ட தரவுகளை பாதுகாக்கும் உரிமையை மற்றும் சட்டப்பூர்வமான நோக்கங்களுக்காக அவ்வாறு தனிப்பட்ட தரவுகளை செயலாக்கும் தேவையை கௌரவிக்கும் வகையில் டிஜிட்டல் தனிப்பட்ட தரவுகளை செயலாக்குவதற்கான ஒரு சட்டம் மற்றும் அதனுடன் தொடர்புடைய அல்லது உச்சிகாவியவற்றை சார்ந்த விவகாரங்களுக்கான ஒரு சட்டம்",
        manage_consent_title: "ஒப்புதல் முன்னுரிமைகளை நிர்வகிக்கவும்",
        primary: "ஏற்றுக்கொள்",
        secondary: "ரத்து",
        select_all: "அனைத்தையும் தேர்வுசெய்க",
    },
    LanguageStrings {
        language: "telugu",
        header: "సమ్మతి నోటీసు",
        title: "డిజిటల్ వ్యక్తిగత డేటా రక్షణ చట్టం 2023",
        description: "వ్యక్తుల వ్యక్తిగత డేటా రక్షణ హక్కును మరియు చట్టబద్ధమైన ఉద్దేశ్యాల కోసం ఆ డేటాను ప్రాసెస్ చేయడానికి అవసరాన్ని గుర్తించేవిధంగా డిజిటల్ వ్యక్తిగత డేటా ప్రాసెసింగ్ కోసం ఒక చట్టం మరియు దానికి సంబంధించిన లేదా అనుబంధ విషయాల కోసం",
        manage_consent_title: "సమ్మతి ప్రాధాన్యతలను నిర్వహించండి",
        primary: "అంగీకరించు",
        secondary: "రద్దు చేయి",
        select_all: "అన్నీ ఎంచుకో",
    },
    LanguageStrings {
        language: "gujarati",
        header: "મંજુરી સૂચના",
        title: "ડિજિટલ વ્યક્તિગત ડેટા સુરક્ષા અધિનિયમ 2023",
        description: "વ્યક્તિઓના વ્યક્તિગત ડેટાને સુરક્ષિત રાખવા હક્ક અને કાનૂની હેતુઓ માટે આવા ડેટાના પ્રોસેસિંગની જરૂરિયાત બંનેને માન્યતા આપતી રીતે ડિજિટલ વ્યક્તિગત ડેટાના પ્રોસેસિંગ માટેનો એક અધિનિયમ અને તેનાથી જોડાયેલા અથવા સબંધિત બાબતો માટે",
        manage_consent_title: "મંજુરી પસંદગીઓ મેનેજ કરો",
        primary: "સ્વીકારો",
        secondary: "રદ કરો",
        select_all: "બધા પસંદ કરો",
    },
    LanguageStrings {
        language: "assamese",
        header: "সম্মতি সূচনা",
        title: "ডিজিটেল ব্যক্তিগত তথ্য সুৰক্ষা আইন 2023",
        description: "ব্যক্তিৰ ব্যক্তিগত তথ্য সুৰক্ষাৰ অধিকাৰ আৰু আইনানুগ উদ্দেশ্যৰ বাবে সেই ব্যক্তিগত তথ্য প্ৰসেশন কৰিবলৈ প্ৰয়োজনীয়তাক মান্যতা দিয়াৰ কাৰণে ডিজিটেল ব্যক্তিগত তথ্য প্ৰসেশনৰ ব্যৱস্থা কৰিবলৈ এক আইন আৰু তাৰ সৈতে সম্পৰ্কিত বা আনুষঙ্গিক বিষয়ৰ বাবে এক আইন",
        manage_consent_title: "সম্মতি পছন্দসমূহ পৰিচালনা কৰক",
        primary: "গ্ৰহণ কৰক",
        secondary: "বাতিল কৰক",
        select_all: "সকলো বাছক",
    },
    LanguageStrings {
        language: "bengali",
        header: "সম্মতি নোটিশ",
        title: "ডিজিটাল ব্যক্তিগত তথ্য সুরক্ষা আইন 2023",
        description: "একটি আইন যা ব্যক্তিরা তাদের ব্যক্তিগত তথ্য সুরক্ষার অধিকার এবং এই ধরনের ব্যক্তিগত তথ্য আইনগত উদ্দেশ্যে প্রক্রিয়া করার প্রয়োজনীয়তা উভয়কেই স্বীকৃতি দেয়, ডিজিটাল ব্যক্তিগত তথ্য প্রক্রিয়া করার জন্য এবং এর সাথে সম্পর্কিত বা আনুষঙ্গিক বিষয়ে একটি আইন",
        manage_consent_title: "সম্মতি পছন্দগুলি পরিচালনা করুন",
        primary: "গ্রহণ করুন",
        secondary: "বাতিল করুন",
        select_all: "সবগুলি নির্বাচন করুন",
    },
    LanguageStrings {
        language: "bodo",
        header: "अनुमति बिजेनाय",
        title: "डिजिटल व्यक्तिगत डेटा रक्षा ऐन 2023",
        description: "दखालोंगुं आपन व्यक्तिगत डेटा सुरुखो अरथ बिसारवाव अर कानूनी उद्देश्य नाय दादखाल किया होओ बिसारवाव ददरखाय माने ओसोर डाटानाय प्रोससिंग करव फालंगुं बिसार होओ एक ऐन अर हेगोगोनाय संबधि ओसोर या उडातै बिजें नाय एक ऐन",
        manage_consent_title: "अनुमति प्रायोरिटिज मोजैनाव",
        primary: "आसरा",
        secondary: "खतमाव",
        select_all: "सब ओनाय चुनाव",
    },
    LanguageStrings {
        language: "dogri",
        header: "सहमति सूचना",
        title: "डिजिटल व्यक्तिगत डेटा संरक्षण अधिनियम 2023",
        description: "डिजिटल व्यक्तिगत डेटा दे प्रोसेसिंग दे लई इक क़ानून जो की व्यक्तियों दे व्यक्तिगत डेटा दे संरक्षण दे अधिकार अते ऐसे व्यक्तिगत डेटा नू क़ानूनी मकसदां दे लई प्रोसेस करन दी लोड नू मान्यता दिन्दा है, अते उसनाल जुड़े होए या उस दे होर मामले लई",
        manage_consent_title: "सहमति प्राथमिकतावाँ प्रबंधित करो",
        primary: "स्वीकारो",
        secondary: "रद्द करो",
        select_all: "सारे चूनो",
    },
    LanguageStrings {
        language: "kashmiri",
        header: "رضایت نامہ",
        title: "ڈیجیٹل پرسنل ڈیٹا پروٹیکشن ایکٹ 2023",
        description: "ایک ایسا قانون جو افراد کے ذاتی ڈیٹا کے تحفظ کے حق اور اس طرح کے ذاتی ڈیٹا کو قانونی مقاصد کے لیے پروسیس کرنے کی ضرورت دونوں کو تسلیم کرتا ہے، ڈیجیٹل ذاتی ڈیٹا پروسیسنگ کے لیے اور اس سے متعلقہ یا اس سے متعلق معاملات کے لیے",
        manage_consent_title: "رضامندی کی ترجیحات کا نظم کریں",
        primary: "قبول کریں",
        secondary: "منسوخ کریں",
        select_all: "سبھی کا انتخاب کریں",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeMetaData {
    pub header: &'static str,
    #[serde(rename = "mp3Link")]
    pub mp3_link: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub manage_consent_title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeButtons {
    pub primary: &'static str,
    pub secondary: &'static str,
    #[serde(rename = "selectAll")]
    pub select_all: &'static str,
}

/// The collection point as embedded in a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeCollectionPoint {
    pub cp_id: String,
    pub cp_name: String,
    pub cp_status: String,
    pub cp_url: String,
    pub data_elements: Vec<DataElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedNotice {
    pub collection_point: NoticeCollectionPoint,
    pub meta_data: NoticeMetaData,
    pub button: NoticeButtons,
}

/// Rendered notice: `urls` plus one key per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeInfo {
    pub urls: NoticeUrls,
    #[serde(flatten)]
    pub languages: BTreeMap<&'static str, LocalizedNotice>,
}

/// Render the notice for a stored collection point.
pub fn render(cp: &CollectionPointRecord) -> NoticeInfo {
    let embedded = NoticeCollectionPoint {
        cp_id: cp.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        cp_name: cp.cp_name.clone(),
        cp_status: cp.cp_status.clone(),
        cp_url: cp.cp_url.clone(),
        data_elements: cp.data_elements.clone(),
    };

    let languages = LANGUAGES
        .iter()
        .map(|l| {
            let notice = LocalizedNotice {
                collection_point: embedded.clone(),
                meta_data: NoticeMetaData {
                    header: l.header,
                    mp3_link: MP3_LINK,
                    title: l.title,
                    description: l.description,
                    manage_consent_title: l.manage_consent_title,
                },
                button: NoticeButtons {
                    primary: l.primary,
                    secondary: l.secondary,
                    select_all: l.select_all,
                },
            };
            (l.language, notice)
        })
        .collect();

    NoticeInfo {
        urls: URLS,
        languages,
    }
}
